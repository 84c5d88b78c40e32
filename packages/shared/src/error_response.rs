//! # エラーレスポンス
//!
//! BFF が返す共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - モバイルクライアントとの互換性のため、形式は `{"error": "<メッセージ>"}` に固定する
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は BFF の責務（shared に axum 依存を入れない）

use serde::{Deserialize, Serialize};

/// リクエストボディが存在しない、または JSON として解釈できない場合のメッセージ
pub const NO_DATA_PROVIDED: &str = "No data provided";

/// 上流サービスへのログインに失敗した場合のメッセージ
pub const AUTHENTICATION_FAILED: &str = "Authentication failed. Please check your credentials.";

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// 任意のメッセージでエラーレスポンスを作成する
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// 401: 認証失敗
    pub fn authentication_failed() -> Self {
        Self::new(AUTHENTICATION_FAILED)
    }
}
