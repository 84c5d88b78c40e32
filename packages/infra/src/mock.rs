//! # テスト用モック上流サービス
//!
//! 上流サービスを使うテストで利用するインメモリのモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! vitalsync-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    sync::{
        Arc,
        Mutex,
        PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use vitalsync_domain::credentials::Credentials;

use crate::{
    UpstreamError,
    upstream::{
        ActivitySummary,
        DailyStats,
        HrvData,
        SleepData,
        StressData,
        UpstreamAuthenticator,
        UpstreamSession,
        UserMetrics,
    },
};

// ===== MockUpstreamSession =====

/// フィードごとに返す値を設定できるモックセッション
#[derive(Debug, Clone)]
pub struct MockUpstreamSession {
    pub probe:        Result<(), UpstreamError>,
    pub stress:       Result<Option<StressData>, UpstreamError>,
    pub sleep:        Result<Option<SleepData>, UpstreamError>,
    pub daily_stats:  Result<Option<DailyStats>, UpstreamError>,
    pub activities:   Result<Option<Vec<ActivitySummary>>, UpstreamError>,
    pub hrv:          Result<Option<HrvData>, UpstreamError>,
    pub user_metrics: Result<Option<UserMetrics>, UpstreamError>,
    /// 各呼び出しの応答までの待ち時間
    pub latency:      Duration,
}

impl MockUpstreamSession {
    /// すべてのフィードが「データなし」を返すセッション
    pub fn empty() -> Self {
        Self {
            probe:        Ok(()),
            stress:       Ok(None),
            sleep:        Ok(None),
            daily_stats:  Ok(None),
            activities:   Ok(None),
            hrv:          Ok(None),
            user_metrics: Err(UpstreamError::Unsupported),
            latency:      Duration::ZERO,
        }
    }

    /// すべての呼び出しが未認証で拒否されるセッション
    pub fn rejected() -> Self {
        Self {
            probe:        Err(UpstreamError::SessionExpired),
            stress:       Err(UpstreamError::SessionExpired),
            sleep:        Err(UpstreamError::SessionExpired),
            daily_stats:  Err(UpstreamError::SessionExpired),
            activities:   Err(UpstreamError::SessionExpired),
            hrv:          Err(UpstreamError::SessionExpired),
            user_metrics: Err(UpstreamError::SessionExpired),
            latency:      Duration::ZERO,
        }
    }

    async fn respond<T: Clone>(&self, value: &Result<T, UpstreamError>) -> Result<T, UpstreamError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        value.clone()
    }
}

#[async_trait]
impl UpstreamSession for MockUpstreamSession {
    async fn probe(&self, _date: NaiveDate) -> Result<(), UpstreamError> {
        self.respond(&self.probe).await
    }

    async fn stress(&self, _date: NaiveDate) -> Result<Option<StressData>, UpstreamError> {
        self.respond(&self.stress).await
    }

    async fn sleep(&self, _date: NaiveDate) -> Result<Option<SleepData>, UpstreamError> {
        self.respond(&self.sleep).await
    }

    async fn daily_stats(&self, _date: NaiveDate) -> Result<Option<DailyStats>, UpstreamError> {
        self.respond(&self.daily_stats).await
    }

    async fn activities(
        &self,
        _start: u32,
        _limit: u32,
    ) -> Result<Option<Vec<ActivitySummary>>, UpstreamError> {
        self.respond(&self.activities).await
    }

    async fn hrv(&self, _date: NaiveDate) -> Result<Option<HrvData>, UpstreamError> {
        self.respond(&self.hrv).await
    }

    async fn user_metrics(&self) -> Result<Option<UserMetrics>, UpstreamError> {
        self.respond(&self.user_metrics).await
    }
}

// ===== MockUpstreamAuthenticator =====

/// 特定のパスワードだけを受け付けるモック認証
///
/// ログインに成功するたびに、設定済みのセッションの複製を返す。
pub struct MockUpstreamAuthenticator {
    password: String,
    session:  Mutex<MockUpstreamSession>,
    logins:   AtomicUsize,
}

impl MockUpstreamAuthenticator {
    pub fn new(password: impl Into<String>, session: MockUpstreamSession) -> Self {
        Self {
            password: password.into(),
            session:  Mutex::new(session),
            logins:   AtomicUsize::new(0),
        }
    }

    /// 以降のログインで返すセッションを差し替える
    pub fn set_session(&self, session: MockUpstreamSession) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// 成功したログインの回数
    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamAuthenticator for MockUpstreamAuthenticator {
    async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<Arc<dyn UpstreamSession>, UpstreamError> {
        if credentials.password().as_str() != self.password {
            return Err(UpstreamError::AuthenticationFailed);
        }
        self.logins.fetch_add(1, Ordering::SeqCst);
        let session = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Ok(Arc::new(session))
    }
}
