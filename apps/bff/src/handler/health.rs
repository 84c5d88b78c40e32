//! # ヘルスチェックハンドラ
//!
//! BFF の稼働状態を確認するためのエンドポイント。
//! 上流サービスには問い合わせず、プロセスが応答できることだけを示す。

use axum::Json;
use vitalsync_shared::HealthResponse;

/// BFF のヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
