//! # Request ID 伝播ミドルウェア
//!
//! BFF → 上流サービスへの Request ID 伝播を実現する。
//!
//! ## 仕組み
//!
//! 1. [`store_request_id`] ミドルウェアが `SetRequestIdLayer` の設定した
//!    [`RequestId`](tower_http::request_id::RequestId) を task-local に保存する
//! 2. [`inject_request_id`] ヘルパーが task-local から Request ID を取得し、
//!    reqwest の `RequestBuilder` に `X-Request-Id` ヘッダーとして付与する
//!
//! フィードの並行取得は `tokio::join!` で同じタスク内に閉じるため、
//! task-local の値はすべての上流呼び出しから参照できる。

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tower_http::request_id::RequestId;
use vitalsync_shared::observability::REQUEST_ID_HEADER;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 現在のリクエストの Request ID を取得する
///
/// task-local スコープ外（テスト等）では `None` を返す。
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// Request ID を task-local に保存するミドルウェア
pub async fn store_request_id(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-")
        .to_string();

    REQUEST_ID.scope(request_id, next.run(request)).await
}

/// 指定した Request ID のスコープで future を実行する
pub async fn with_request_id<F: Future>(request_id: impl Into<String>, future: F) -> F::Output {
    REQUEST_ID.scope(request_id.into(), future).await
}

/// reqwest リクエストビルダーに `X-Request-Id` ヘッダーを付与する
///
/// task-local スコープ外の場合はビルダーをそのまま返す。
pub fn inject_request_id(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match current_request_id() {
        Some(id) => builder.header(REQUEST_ID_HEADER, id),
        None => builder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_request_id_task_localスコープ外でnoneを返す() {
        assert_eq!(current_request_id(), None);
    }

    #[tokio::test]
    async fn test_inject_request_id_task_local設定時にヘッダーを付与する() {
        let client = reqwest::Client::new();

        let request = with_request_id("req-0001", async {
            inject_request_id(client.get("http://upstream.invalid/hrv")).build().unwrap()
        })
        .await;

        assert_eq!(
            request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-0001")
        );
    }

    #[tokio::test]
    async fn test_inject_request_id_task_local未設定時にビルダーを変更しない() {
        let client = reqwest::Client::new();
        let request = inject_request_id(client.get("http://upstream.invalid/hrv"))
            .build()
            .unwrap();

        assert!(request.headers().get("x-request-id").is_none());
    }

    #[tokio::test]
    async fn test_joinで並行実行してもrequest_idを参照できる() {
        let (a, b) = with_request_id("req-0002", async {
            tokio::join!(async { current_request_id() }, async {
                current_request_id()
            })
        })
        .await;

        assert_eq!(a.as_deref(), Some("req-0002"));
        assert_eq!(b.as_deref(), Some("req-0002"));
    }
}
