//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、集約処理は `usecase` に委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `auth`: 上流サービスへのログイン確認
//! - `report`: 日次レポート、ストレスのみの取得

pub mod auth;
pub mod health;
pub mod report;

pub use auth::{AuthState, login};
pub use health::health_check;
pub use report::{ReportState, all_data, stress};
