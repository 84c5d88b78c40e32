//! # 外部サービスクライアント
//!
//! BFF から上流フィットネスサービスへの通信を担当する。
//!
//! トレイト（[`UpstreamAuthenticator`](vitalsync_infra::UpstreamAuthenticator) /
//! [`UpstreamSession`](vitalsync_infra::UpstreamSession)）は infra 層で定義し、
//! ここでは reqwest による HTTP 実装を提供する。

mod upstream;

pub use upstream::{HttpUpstreamClient, HttpUpstreamSession};
