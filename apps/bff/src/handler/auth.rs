//! # 認証ハンドラ
//!
//! 上流サービスの認証情報が有効かを確認するエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /login` - 認証情報で上流サービスにログインする
//!
//! ログインに成功したセッションはキャッシュされ、続く `/all_data` などで再利用される。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use vitalsync_domain::credentials::Credentials;
use vitalsync_infra::SessionManager;

use crate::error::ApiError;

/// 認証ハンドラの共有状態
pub struct AuthState {
    pub session_manager: Arc<SessionManager>,
}

// --- リクエスト/レスポンス型 ---

/// ログインリクエスト
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email:    Option<String>,
    pub password: Option<String>,
}

/// ログインレスポンス
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
}

impl LoginResponse {
    pub fn success() -> Self {
        Self { status: "success" }
    }
}

// --- ハンドラ ---

/// POST /login
///
/// 上流サービスへのログインを確認する。
///
/// - 200: `{"status": "success"}`
/// - 400: ボディなし、または email / password の不足
/// - 401: 上流サービスへのログイン失敗
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AuthState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = body?;
    let credentials = Credentials::new(req.email.as_deref(), req.password.as_deref())?;

    state.session_manager.resolve(&credentials).await?;

    tracing::info!(email = %credentials.email(), "上流サービスへのログインに成功しました");
    Ok(Json(LoginResponse::success()))
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, routing::post};
    use chrono::{Local, TimeZone};
    use http::{Method, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use vitalsync_domain::clock::FixedClock;
    use vitalsync_infra::{
        CredentialKeyDeriver,
        SessionCacheConfig,
        mock::{MockUpstreamAuthenticator, MockUpstreamSession},
    };

    use super::*;

    fn create_test_app(authenticator: Arc<MockUpstreamAuthenticator>) -> Router {
        let clock = FixedClock::new(Local.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
        let session_manager = Arc::new(SessionManager::new(
            authenticator,
            Arc::new(clock),
            CredentialKeyDeriver::new().unwrap(),
            SessionCacheConfig::default(),
        ));

        Router::new()
            .route("/login", post(login))
            .with_state(Arc::new(AuthState { session_manager }))
    }

    fn login_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_正しい認証情報でsuccessを返す() {
        let authenticator = Arc::new(MockUpstreamAuthenticator::new(
            "secret",
            MockUpstreamSession::empty(),
        ));
        let sut = create_test_app(authenticator.clone());

        let response = sut
            .oneshot(login_request(r#"{"email":"user@example.com","password":"secret"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, json!({"status": "success"}));
        assert_eq!(authenticator.login_count(), 1);
    }

    #[tokio::test]
    async fn test_誤った認証情報で401を返す() {
        let authenticator = Arc::new(MockUpstreamAuthenticator::new(
            "secret",
            MockUpstreamSession::empty(),
        ));
        let sut = create_test_app(authenticator);

        let response = sut
            .oneshot(login_request(r#"{"email":"user@example.com","password":"wrong"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response_json(response).await,
            json!({"error": "Authentication failed. Please check your credentials."})
        );
    }

    #[rstest]
    #[case(r#"{"email":"user@example.com"}"#, "Email and password required")]
    #[case(r#"{"password":"secret"}"#, "Email and password required")]
    #[case(r#"{"email":"","password":"secret"}"#, "Email and password required")]
    #[case("", "No data provided")]
    #[case("not json", "No data provided")]
    #[tokio::test]
    async fn test_認証情報が不足していると上流に問い合わせず400を返す(
        #[case] body: &str,
        #[case] expected_error: &str,
    ) {
        let authenticator = Arc::new(MockUpstreamAuthenticator::new(
            "secret",
            MockUpstreamSession::empty(),
        ));
        let sut = create_test_app(authenticator.clone());

        let response = sut.oneshot(login_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response_json(response).await, json!({"error": expected_error}));
        assert_eq!(authenticator.login_count(), 0);
    }
}
