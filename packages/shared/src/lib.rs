//! # VitalSync 共有ユーティリティ
//!
//! このクレートは、VitalSync
//! プロジェクト全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, bff）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum など Web フレームワークへの依存は持たない

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::HealthResponse;
