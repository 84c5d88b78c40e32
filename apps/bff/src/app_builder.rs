//! # BFF アプリケーション構築
//!
//! State の初期化とルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use vitalsync_domain::clock::Clock;
use vitalsync_infra::SessionManager;
use vitalsync_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};

use crate::{
    handler::{AuthState, ReportState, all_data, health_check, login, stress},
    middleware::{no_store, request_id::store_request_id},
};

/// ルーターを構築する
///
/// セッションマネージャと時計を受け取り、State → Router の順に組み立てる。
/// 上流クライアントはセッションマネージャの内側に閉じている。
pub fn build_app(session_manager: Arc<SessionManager>, clock: Arc<dyn Clock>) -> Router {
    let auth_state = Arc::new(AuthState {
        session_manager: session_manager.clone(),
    });
    let report_state = Arc::new(ReportState {
        session_manager,
        clock,
    });

    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/login", post(login))
                .with_state(auth_state),
        )
        .merge(
            Router::new()
                .route("/all_data", post(all_data))
                .route("/stress", post(stress))
                .with_state(report_state),
        )
        // 認証情報を含むレスポンスを中間キャッシュに残さない
        .layer(from_fn(no_store))
        .layer(CorsLayer::permissive())
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（クライアント提供値があればそれを使用）
        // 2. TraceLayer: スパンに request_id を含め、全ログに付与
        // 3. CanonicalLogLineLayer: リクエスト完了時に1行サマリログを出力
        // 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        // 5. store_request_id: task-local に保存し、上流へのリクエストに伝播
        .layer(from_fn(store_request_id))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
