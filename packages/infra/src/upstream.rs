//! # 上流サービス
//!
//! 上流フィットネスサービスとのやり取りをトレイトで抽象化する。
//!
//! - [`UpstreamAuthenticator`]: 認証情報でログインし、認証済みセッションを作る
//! - [`UpstreamSession`]: 認証済みセッション。各フィードを取得する
//!
//! フィード取得はすべて `Result<Option<Dto>, UpstreamError>` を返す。
//! `Ok(None)` は「データが存在しない」（HTTP 204 / 404 など）を表し、エラーではない。
//!
//! テスト時はスタブ実装に差し替える。

pub mod dto;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
pub use dto::{
    ActivitySummary,
    DailySleep,
    DailyStats,
    HrvData,
    HrvReadingData,
    HrvSummaryData,
    SleepData,
    SleepHrvSummary,
    StressData,
    UserMetrics,
};
use vitalsync_domain::credentials::Credentials;

use crate::UpstreamError;

/// 上流サービスの認証を担当するトレイト
#[async_trait]
pub trait UpstreamAuthenticator: Send + Sync {
    /// 認証情報でログインし、認証済みセッションを返す
    ///
    /// 認証情報の拒否やログイン処理の失敗はすべて `Err` になる。
    async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<Arc<dyn UpstreamSession>, UpstreamError>;
}

/// 上流サービスの認証済みセッション
#[async_trait]
pub trait UpstreamSession: Send + Sync {
    /// セッションが有効かを軽量な呼び出しで確認する
    ///
    /// 既定では指定日の日次サマリを取得できるかで判定する。
    async fn probe(&self, date: NaiveDate) -> Result<(), UpstreamError> {
        self.daily_stats(date).await.map(|_| ())
    }

    /// 指定日のストレスデータを取得する
    async fn stress(&self, date: NaiveDate) -> Result<Option<StressData>, UpstreamError>;

    /// 指定日の睡眠データを取得する
    async fn sleep(&self, date: NaiveDate) -> Result<Option<SleepData>, UpstreamError>;

    /// 指定日の日次統計（歩数・消費カロリーなど）を取得する
    async fn daily_stats(&self, date: NaiveDate) -> Result<Option<DailyStats>, UpstreamError>;

    /// 直近のアクティビティを新しい順に取得する
    async fn activities(
        &self,
        start: u32,
        limit: u32,
    ) -> Result<Option<Vec<ActivitySummary>>, UpstreamError>;

    /// 指定日の HRV データを取得する
    async fn hrv(&self, date: NaiveDate) -> Result<Option<HrvData>, UpstreamError>;

    /// ユーザーの身体指標（VO2max など）を取得する
    ///
    /// 上流クライアントが対応していない場合は [`UpstreamError::Unsupported`]。
    async fn user_metrics(&self) -> Result<Option<UserMetrics>, UpstreamError> {
        Err(UpstreamError::Unsupported)
    }
}
