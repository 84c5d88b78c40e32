//! # BFF エラーハンドリング
//!
//! HTTP API のエラー定義と、axum レスポンスへの変換。
//!
//! レスポンスボディはモバイルクライアントとの互換性のため `{"error": "<メッセージ>"}` に固定する。
//!
//! | エラー | ステータス | メッセージ |
//! |--------|-----------|------------|
//! | `BadRequest` | 400 | ボディなし、認証情報不足、日付の形式不正 |
//! | `AuthenticationFailed` | 401 | 固定メッセージ |
//! | `Internal` | 500 | エラー内容をそのまま返す |

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use vitalsync_domain::DomainError;
use vitalsync_infra::SessionError;
use vitalsync_shared::ErrorResponse;

use crate::usecase::AggregationError;

/// BFF 層で発生するエラー
///
/// `IntoResponse` を実装しているため、ハンドラから `?` でそのまま返せる。
#[derive(Debug, Error)]
pub enum ApiError {
    /// リクエストの不備（400 Bad Request）
    #[error("{0}")]
    BadRequest(String),

    /// 上流サービスへのログイン失敗（401 Unauthorized）
    #[error("上流サービスの認証に失敗しました")]
    AuthenticationFailed,

    /// 想定外の失敗（500 Internal Server Error）
    #[error("{0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("リクエストボディを解釈できません: {}", rejection.body_text());
        ApiError::BadRequest(vitalsync_shared::error_response::NO_DATA_PROVIDED.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Authentication(_) => ApiError::AuthenticationFailed,
            SessionError::KeyDerivation(msg) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "credential_key",
                    "認証情報キーの導出に失敗: {}",
                    msg
                );
                ApiError::Internal(msg)
            }
        }
    }
}

impl From<AggregationError> for ApiError {
    fn from(err: AggregationError) -> Self {
        tracing::error!(
            error.category = "external_service",
            error.kind = "aggregation",
            "レポートの集約に失敗: {}",
            err
        );
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => bad_request_response(msg),
            ApiError::AuthenticationFailed => authentication_failed_response(),
            ApiError::Internal(msg) => internal_error_response(msg),
        }
    }
}

// --- レスポンスヘルパー ---

/// 400 Bad Request レスポンス
pub fn bad_request_response(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
}

/// 認証失敗レスポンス
pub fn authentication_failed_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::authentication_failed()),
    )
        .into_response()
}

/// 内部エラーレスポンス
pub fn internal_error_response(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
        .into_response()
}
