//! # 認証情報キー
//!
//! セッションキャッシュのキーを認証情報から導出する。
//!
//! 生のパスワードをキャッシュに保持しないよう、識別子とパスワードの組から
//! Argon2id で固定長のキーを導出して使う。ソルトはプロセス起動ごとにランダムに生成するため、
//! キーはプロセスの外では意味を持たない。

use std::fmt;

use argon2::{Algorithm, Argon2, Params, Version};
use vitalsync_domain::credentials::Credentials;

use crate::SessionError;

/// 導出するキーの長さ（バイト）
const KEY_LENGTH: usize = 32;

/// ソルトの長さ（バイト）
const SALT_LENGTH: usize = 16;

/// セッションキャッシュのキー
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialKey([u8; KEY_LENGTH]);

impl fmt::Debug for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CredentialKey").field(&"[REDACTED]").finish()
    }
}

/// 認証情報からキャッシュキーを導出する
///
/// リクエストごとに導出するため、パスワード保存用よりも軽いパラメータを使う:
/// - Memory: 4 MB
/// - Iterations: 1
/// - Parallelism: 1
pub struct CredentialKeyDeriver {
    argon2: Argon2<'static>,
    salt:   [u8; SALT_LENGTH],
}

impl CredentialKeyDeriver {
    /// ランダムなソルトで作成する
    pub fn new() -> Result<Self, SessionError> {
        Self::with_salt(rand::random())
    }

    /// 指定したソルトで作成する
    pub fn with_salt(salt: [u8; SALT_LENGTH]) -> Result<Self, SessionError> {
        let params = Params::new(
            4096, // memory (KB) = 4 MB
            1,    // iterations
            1,    // parallelism
            Some(KEY_LENGTH),
        )
        .map_err(|e| SessionError::KeyDerivation(format!("Argon2 パラメータが不正です: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            salt,
        })
    }

    /// 認証情報からキーを導出する
    ///
    /// 識別子とパスワードの境界が曖昧にならないよう、識別子の長さを前置して連結する。
    pub fn derive(&self, credentials: &Credentials) -> Result<CredentialKey, SessionError> {
        let email = credentials.email().as_bytes();
        let password = credentials.password().as_str().as_bytes();

        let mut input = Vec::with_capacity(8 + email.len() + password.len());
        input.extend_from_slice(&(email.len() as u64).to_be_bytes());
        input.extend_from_slice(email);
        input.extend_from_slice(password);

        let mut key = [0u8; KEY_LENGTH];
        self.argon2
            .hash_password_into(&input, &self.salt, &mut key)
            .map_err(|e| SessionError::KeyDerivation(e.to_string()))?;

        Ok(CredentialKey(key))
    }
}
