//! # インフラ層エラー定義
//!
//! 上流サービスとの通信、およびセッション管理で発生するエラーを表現する。
//!
//! | エラー | 発生箇所 | BFF での扱い |
//! |--------|----------|--------------|
//! | [`UpstreamError`] | 上流サービスへの各呼び出し | ログイン時は 401、フィード取得時はそのフィードを `null` |
//! | [`SessionError`] | セッションの解決 | 401（キー導出失敗のみ 500） |

use thiserror::Error;

/// 上流サービスへの呼び出しで発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// ログインの拒否（401 / 403）
    #[error("上流サービスの認証に失敗しました")]
    AuthenticationFailed,

    /// セッションの失効（認証済み呼び出しに対する 401）
    #[error("上流サービスのセッションが無効です")]
    SessionExpired,

    /// データへのアクセス権限がない（403）
    #[error("上流サービスへのアクセス権限がありません")]
    PermissionDenied,

    /// 上流サービスが一時的に利用できない（接続失敗、タイムアウト、429、5xx）
    #[error("上流サービスが一時的に利用できません")]
    ServiceUnavailable,

    /// ネットワークエラー
    #[error("ネットワークエラー: {0}")]
    Network(String),

    /// レスポンスボディを解釈できない
    #[error("レスポンスの解析に失敗しました: {0}")]
    InvalidResponse(String),

    /// この上流クライアントが対応していない操作
    #[error("この操作には対応していません")]
    Unsupported,

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl UpstreamError {
    /// 認証そのものが拒否されたことを示すエラーか
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::AuthenticationFailed | Self::SessionExpired)
    }

    /// ログの `error.kind` に使う識別子
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::SessionExpired => "session_expired",
            Self::PermissionDenied => "permission_denied",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Network(_) => "network",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Unsupported => "unsupported",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

/// セッションの解決で発生するエラー
#[derive(Debug, Error)]
pub enum SessionError {
    /// 上流サービスへのログインに失敗した
    #[error("上流サービスへのログインに失敗しました: {0}")]
    Authentication(#[source] UpstreamError),

    /// 認証情報からキャッシュキーを導出できなかった
    #[error("認証情報キーの導出に失敗しました: {0}")]
    KeyDerivation(String),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(UpstreamError::AuthenticationFailed, true)]
    #[case(UpstreamError::SessionExpired, true)]
    #[case(UpstreamError::PermissionDenied, false)]
    #[case(UpstreamError::ServiceUnavailable, false)]
    #[case(UpstreamError::Network("reset".into()), false)]
    fn test_認証拒否の判定(#[case] error: UpstreamError, #[case] expected: bool) {
        assert_eq!(error.is_unauthenticated(), expected);
    }

    #[test]
    fn test_エラーメッセージにソースが含まれる() {
        let error = SessionError::Authentication(UpstreamError::AuthenticationFailed);

        assert_eq!(
            error.to_string(),
            "上流サービスへのログインに失敗しました: 上流サービスの認証に失敗しました"
        );
    }
}
