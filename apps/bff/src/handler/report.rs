//! # レポートハンドラ
//!
//! 上流サービスのデータを正規化して返すエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /all_data` - 日次ヘルスレポート（ストレス・睡眠・アクティビティ・HRV）
//! - `POST /stress` - ストレスの概要のみ
//!
//! ## 日付の既定値
//!
//! - `date` 未指定: サーバーローカルの今日（`use_yesterday` が真なら昨日）
//! - `sleep_date` 未指定: `date` の前日

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use vitalsync_domain::{
    clock::Clock,
    credentials::Credentials,
    report::{HealthReport, StressSummary},
    report_date::ReportDates,
};
use vitalsync_infra::SessionManager;

use crate::{
    error::ApiError,
    usecase::{aggregate_report, fetch_stress_summary},
};

/// レポートハンドラの共有状態
pub struct ReportState {
    pub session_manager: Arc<SessionManager>,
    pub clock:           Arc<dyn Clock>,
}

/// レポートリクエスト
#[derive(Deserialize)]
pub struct ReportRequest {
    pub email:         Option<String>,
    pub password:      Option<String>,
    pub date:          Option<String>,
    pub sleep_date:    Option<String>,
    pub use_yesterday: Option<bool>,
}

impl ReportRequest {
    /// 認証情報と対象日を検証する
    ///
    /// 上流サービスに問い合わせる前に、入力の不備をすべてここで弾く。
    fn validate(&self, clock: &dyn Clock) -> Result<(Credentials, ReportDates), ApiError> {
        let credentials = Credentials::new(self.email.as_deref(), self.password.as_deref())?;
        let dates = ReportDates::resolve(
            self.date.as_deref(),
            self.sleep_date.as_deref(),
            self.use_yesterday.unwrap_or(false),
            clock,
        )?;
        Ok((credentials, dates))
    }
}

/// POST /all_data
///
/// - 200: 日次ヘルスレポート（取得できなかったフィードは `null`）
/// - 400: ボディなし、認証情報の不足、日付の形式不正
/// - 401: 上流サービスへのログイン失敗
/// - 500: 集約全体の失敗
#[tracing::instrument(skip_all)]
pub async fn all_data(
    State(state): State<Arc<ReportState>>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<HealthReport>, ApiError> {
    let Json(req) = body?;
    let (credentials, dates) = req.validate(state.clock.as_ref())?;

    let session = state.session_manager.resolve(&credentials).await?;
    let report = aggregate_report(session.as_ref(), dates).await?;

    Ok(Json(report))
}

/// POST /stress
///
/// 対象日のストレスの概要を返す。データが無ければ `null`。
#[tracing::instrument(skip_all)]
pub async fn stress(
    State(state): State<Arc<ReportState>>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<Option<StressSummary>>, ApiError> {
    let Json(req) = body?;
    let (credentials, dates) = req.validate(state.clock.as_ref())?;

    let session = state.session_manager.resolve(&credentials).await?;
    let summary = fetch_stress_summary(session.as_ref(), dates.target).await?;

    Ok(Json(summary))
}
