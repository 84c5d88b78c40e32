//! # BFF 設定
//!
//! 環境変数から BFF サーバーの設定を読み込む。
//!
//! | 環境変数 | 既定値 | 内容 |
//! |----------|--------|------|
//! | `BFF_HOST` | `0.0.0.0` | バインドアドレス |
//! | `PORT` | `5002` | ポート番号 |
//! | `UPSTREAM_URL` | （必須） | 上流サービスのベース URL |
//! | `UPSTREAM_RETRY_COUNT` | `3` | 一時的な失敗のリトライ回数 |
//! | `UPSTREAM_RETRY_DELAY_SECS` | `5` | リトライ間隔（秒） |
//! | `UPSTREAM_TIMEOUT_SECS` | `30` | 上流へのリクエストタイムアウト（秒） |
//! | `SESSION_CACHE_TTL_SECS` | `28800` | セッションキャッシュの有効期限（秒） |
//! | `SESSION_CACHE_MAX_ENTRIES` | `1024` | セッションキャッシュの最大エントリ数 |

use std::{env, str::FromStr, time::Duration};

use thiserror::Error;
use vitalsync_infra::SessionCacheConfig;

/// 設定の読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 必須の環境変数が設定されていない
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値を解釈できない
    #[error("{name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// 上流クライアントのリトライ方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最初の試行に加えて行うリトライの回数
    pub count: u32,
    /// リトライ間隔
    pub delay: Duration,
}

/// BFF サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BffConfig {
    /// バインドアドレス
    pub host:             String,
    /// ポート番号
    pub port:             u16,
    /// 上流サービスのベース URL
    pub upstream_url:     String,
    /// 上流クライアントのリトライ方針
    pub retry:            RetryPolicy,
    /// 上流へのリクエストタイムアウト
    pub upstream_timeout: Duration,
    /// セッションキャッシュの設定
    pub session_cache:    SessionCacheConfig,
}

impl BffConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の取得関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let upstream_url = lookup("UPSTREAM_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("UPSTREAM_URL"))?;

        Ok(Self {
            host: lookup("BFF_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 5002)?,
            upstream_url,
            retry: RetryPolicy {
                count: parse_or(&lookup, "UPSTREAM_RETRY_COUNT", 3)?,
                delay: Duration::from_secs(parse_or(&lookup, "UPSTREAM_RETRY_DELAY_SECS", 5)?),
            },
            upstream_timeout: Duration::from_secs(parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 30)?),
            session_cache: SessionCacheConfig {
                ttl:         Duration::from_secs(parse_or(
                    &lookup,
                    "SESSION_CACHE_TTL_SECS",
                    28800,
                )?),
                max_entries: parse_or(&lookup, "SESSION_CACHE_MAX_ENTRIES", 1024)?,
            },
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
