//! # 上流サービス HTTP クライアント
//!
//! 上流フィットネスサービス（Garmin Connect 互換のゲートウェイ）の REST API を呼び出す。
//!
//! ## エンドポイント
//!
//! | 呼び出し | メソッド / パス |
//! |----------|-----------------|
//! | ログイン | `POST /auth/login` |
//! | 生存確認・日次統計 | `GET /usersummary-service/usersummary/daily/{display_name}?calendarDate={date}` |
//! | ストレス | `GET /wellness-service/wellness/dailyStress/{date}` |
//! | 睡眠 | `GET /wellness-service/wellness/dailySleepData/{display_name}?date={date}&nonSleepBufferMinutes=60` |
//! | アクティビティ | `GET /activitylist-service/activities/search/activities?start={start}&limit={limit}` |
//! | HRV | `GET /hrv-service/hrv/{date}` |
//!
//! ## ステータスの扱い
//!
//! | ステータス | 結果 |
//! |-----------|------|
//! | 2xx | ボディを解釈（204 は `None`） |
//! | 401 | `SessionExpired`（ログイン時は `AuthenticationFailed`） |
//! | 403 | `PermissionDenied`（ログイン時は `AuthenticationFailed`） |
//! | 404 | `None` |
//! | 429 / 5xx | リトライ後も続けば `ServiceUnavailable` |
//! | その他 | `Unexpected` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use vitalsync_domain::credentials::Credentials;
use vitalsync_infra::{
    UpstreamAuthenticator,
    UpstreamError,
    UpstreamSession,
    upstream::{ActivitySummary, DailyStats, HrvData, SleepData, StressData},
};

use crate::{config::RetryPolicy, middleware::request_id::inject_request_id};

/// 睡眠データ取得時に前後に含める非睡眠時間（分）
const NON_SLEEP_BUFFER_MINUTES: u32 = 60;

// --- リクエスト/レスポンス型 ---

/// ログインリクエスト
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// ログインレスポンス
#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    display_name: String,
}

/// reqwest のエラーを上流エラーに変換する
fn transport_error(err: reqwest::Error) -> UpstreamError {
    if err.is_connect() || err.is_timeout() {
        UpstreamError::ServiceUnavailable
    } else {
        UpstreamError::Network(err.to_string())
    }
}

/// リトライ対象のステータスか
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// 共通の送信処理
///
/// 接続失敗・タイムアウト・一時的なステータスの場合は、
/// リトライ方針に従って一定間隔で再送する。
#[derive(Clone)]
struct Transport {
    base_url: String,
    client:   reqwest::Client,
    retry:    RetryPolicy,
}

impl Transport {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        build: impl Fn() -> RequestBuilder,
    ) -> Result<Response, UpstreamError> {
        let mut attempt = 0;
        loop {
            let result = inject_request_id(build()).send().await;
            let retryable = match &result {
                Ok(response) => is_retryable_status(response.status()),
                Err(e) => e.is_connect() || e.is_timeout(),
            };

            if !retryable || attempt >= self.retry.count {
                return result.map_err(transport_error);
            }

            drop(result);
            attempt += 1;
            tracing::warn!(
                attempt,
                max_retries = self.retry.count,
                "上流サービスへのリクエストが一時的に失敗したため再送します"
            );
            tokio::time::sleep(self.retry.delay).await;
        }
    }
}

/// レスポンスを DTO に変換する
///
/// データが存在しない場合（204 / 404 / 空ボディ / `null`）は `Ok(None)`。
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<Option<T>, UpstreamError> {
    match response.status() {
        StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => Ok(None),
        status if status.is_success() => {
            let body = response.text().await.map_err(transport_error)?;
            let trimmed = body.trim();
            if trimmed.is_empty() || trimmed == "null" {
                return Ok(None);
            }
            serde_json::from_str(trimmed)
                .map(Some)
                .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
        }
        _ => Err(status_error(response).await),
    }
}

/// レスポンスのステータスだけを確認する（ボディは読まない）
async fn check_status(response: Response) -> Result<(), UpstreamError> {
    match response.status() {
        status if status.is_success() || status == StatusCode::NOT_FOUND => Ok(()),
        _ => Err(status_error(response).await),
    }
}

/// 成功以外のステータスを上流エラーに変換する
async fn status_error(response: Response) -> UpstreamError {
    match response.status() {
        StatusCode::UNAUTHORIZED => UpstreamError::SessionExpired,
        StatusCode::FORBIDDEN => UpstreamError::PermissionDenied,
        status if is_retryable_status(status) || status.is_server_error() => {
            UpstreamError::ServiceUnavailable
        }
        status => {
            let body = response.text().await.unwrap_or_default();
            UpstreamError::Unexpected(format!("予期しないステータス {}: {}", status, body))
        }
    }
}

/// 上流サービス HTTP クライアント（認証）
pub struct HttpUpstreamClient {
    transport: Transport,
}

impl HttpUpstreamClient {
    /// 新しい HttpUpstreamClient を作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: 上流サービスのベース URL（例: `http://localhost:18080`）
    /// - `client`: タイムアウト等を設定済みの reqwest クライアント
    /// - `retry`: 一時的な失敗のリトライ方針
    pub fn new(base_url: &str, client: reqwest::Client, retry: RetryPolicy) -> Self {
        Self {
            transport: Transport {
                base_url: base_url.trim_end_matches('/').to_string(),
                client,
                retry,
            },
        }
    }
}

#[async_trait]
impl UpstreamAuthenticator for HttpUpstreamClient {
    async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<Arc<dyn UpstreamSession>, UpstreamError> {
        let url = self.transport.url("/auth/login");
        let request = LoginRequest {
            username: credentials.email(),
            password: credentials.password().as_str(),
        };

        let response = self
            .transport
            .send(|| self.transport.client.post(&url).json(&request))
            .await?;

        let body = match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(UpstreamError::AuthenticationFailed);
            }
            _ => read_json::<LoginResponse>(response).await?,
        };

        let body = body.ok_or_else(|| {
            UpstreamError::InvalidResponse("ログインレスポンスが空です".to_string())
        })?;

        Ok(Arc::new(HttpUpstreamSession {
            transport:    self.transport.clone(),
            access_token: body.access_token,
            display_name: body.display_name,
        }))
    }
}

/// 上流サービスの認証済みセッション
pub struct HttpUpstreamSession {
    transport:    Transport,
    access_token: String,
    display_name: String,
}

impl HttpUpstreamSession {
    async fn send_get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Response, UpstreamError> {
        let url = self.transport.url(path);
        self.transport
            .send(|| {
                self.transport
                    .client
                    .get(&url)
                    .bearer_auth(&self.access_token)
                    .query(query)
            })
            .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, UpstreamError> {
        let response = self.send_get(path, query).await?;
        read_json(response).await
    }

    fn daily_summary_path(&self) -> String {
        format!(
            "/usersummary-service/usersummary/daily/{}",
            self.display_name
        )
    }
}

#[async_trait]
impl UpstreamSession for HttpUpstreamSession {
    /// 日次サマリのステータスだけで生存確認する
    ///
    /// ボディの形式に左右されないよう、内容は解釈しない。
    async fn probe(&self, date: NaiveDate) -> Result<(), UpstreamError> {
        let response = self
            .send_get(
                &self.daily_summary_path(),
                &[("calendarDate", date.to_string())],
            )
            .await?;
        check_status(response).await
    }

    async fn stress(&self, date: NaiveDate) -> Result<Option<StressData>, UpstreamError> {
        self.get(&format!("/wellness-service/wellness/dailyStress/{date}"), &[])
            .await
    }

    async fn sleep(&self, date: NaiveDate) -> Result<Option<SleepData>, UpstreamError> {
        self.get(
            &format!(
                "/wellness-service/wellness/dailySleepData/{}",
                self.display_name
            ),
            &[
                ("date", date.to_string()),
                (
                    "nonSleepBufferMinutes",
                    NON_SLEEP_BUFFER_MINUTES.to_string(),
                ),
            ],
        )
        .await
    }

    async fn daily_stats(&self, date: NaiveDate) -> Result<Option<DailyStats>, UpstreamError> {
        self.get(
            &self.daily_summary_path(),
            &[("calendarDate", date.to_string())],
        )
        .await
    }

    async fn activities(
        &self,
        start: u32,
        limit: u32,
    ) -> Result<Option<Vec<ActivitySummary>>, UpstreamError> {
        let items: Option<Vec<Value>> = self
            .get(
                "/activitylist-service/activities/search/activities",
                &[("start", start.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(items.map(ActivitySummary::parse_list))
    }

    async fn hrv(&self, date: NaiveDate) -> Result<Option<HrvData>, UpstreamError> {
        self.get(&format!("/hrv-service/hrv/{date}"), &[]).await
    }
}
