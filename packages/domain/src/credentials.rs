//! # 認証情報
//!
//! 上流フィットネスサービスへのログインに使う認証情報（識別子 + シークレット）。
//!
//! 認証情報はリクエストごとに受け取り、永続化しない。
//! セッションキャッシュのキーには生のシークレットではなく派生キーを使う（infra 層）。

use crate::DomainError;

/// 認証情報が欠けている場合のメッセージ
pub const CREDENTIALS_REQUIRED: &str = "Email and password required";

/// 平文パスワード
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
    }
}

impl PlainPassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 上流サービスの認証情報
#[derive(Debug, Clone)]
pub struct Credentials {
    email:    String,
    password: PlainPassword,
}

impl Credentials {
    /// 認証情報を作成する
    ///
    /// どちらかが未指定または空文字の場合はバリデーションエラー。
    pub fn new(email: Option<&str>, password: Option<&str>) -> Result<Self, DomainError> {
        match (email, password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Ok(Self {
                    email:    email.to_string(),
                    password: PlainPassword::new(password),
                })
            }
            _ => Err(DomainError::Validation(CREDENTIALS_REQUIRED.to_string())),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &PlainPassword {
        &self.password
    }
}
