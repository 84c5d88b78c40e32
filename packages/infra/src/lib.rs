//! # VitalSync インフラ層
//!
//! 上流フィットネスサービスとの境界を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **上流サービスの抽象化**: 認証とフィード取得のトレイト、ワイヤ形式の DTO
//! - **セッション管理**: 認証情報ごとの認証済みセッションのキャッシュ
//!
//! HTTP による上流クライアントの具象実装は BFF 側（`client` モジュール）が持つ。
//!
//! ## 依存関係
//!
//! ```text
//! bff → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`credential_key`] - 認証情報からキャッシュキーを導出する
//! - [`error`] - 上流サービス・セッション管理のエラー定義
//! - `mock` - テスト用のモック上流サービス（`test-utils` feature）
//! - [`session`] - セッションキャッシュ（Session Manager）
//! - [`upstream`] - 上流サービスのトレイトと DTO

pub mod credential_key;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod session;
pub mod upstream;

pub use credential_key::{CredentialKey, CredentialKeyDeriver};
pub use error::{SessionError, UpstreamError};
pub use session::{SessionCacheConfig, SessionManager};
pub use upstream::{UpstreamAuthenticator, UpstreamSession};
