//! # 日次レポートの集約
//!
//! 認証済みの上流セッションから 4 つのフィード（ストレス・睡眠・アクティビティ・HRV）を
//! 並行に取得し、それぞれを正規化して 1 つの [`HealthReport`] にまとめる。
//!
//! ## 障害の扱い
//!
//! 各フィードは互いに独立している。取得や解釈に失敗したフィードは [`FeedOutcome::Failed`]
//! としてログに残し、レポート上は `null`（アクティビティは既定値）にする。
//! 1 つのフィードの失敗が他のフィードの計算を妨げることはない。
//!
//! 集約全体が失敗するのは、すべてのフィード取得が上流に「未認証」として拒否された場合
//! （セッション自体が無効な場合）だけである。

use chrono::NaiveDate;
use strum::Display;
use thiserror::Error;
use vitalsync_domain::{
    feed::FeedOutcome,
    report::{
        ActivityReport,
        DailyActivity,
        HealthReport,
        HrvReading,
        HrvReport,
        HrvSummary,
        SleepReport,
        SleepSummary,
        StressSummary,
        sleep_score_label,
        sleep_window,
    },
    report_date::ReportDates,
};
use vitalsync_infra::{
    UpstreamError,
    UpstreamSession,
    upstream::{ActivitySummary, DailyStats, HrvData, SleepData, StressData, UserMetrics},
};

/// 取得する直近アクティビティの件数
pub const RECENT_ACTIVITY_LIMIT: u32 = 10;

/// 集約全体の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// 上流がセッションを受け付けなかった
    #[error("Upstream rejected the session: {0}")]
    SessionRejected(UpstreamError),
}

/// ログの `feed` フィールドに出すフィード名
#[derive(Debug, Clone, Copy, Display)]
#[strum(serialize_all = "snake_case")]
enum Feed {
    Stress,
    Sleep,
    DailyStats,
    Activities,
    Hrv,
    UserMetrics,
}

/// 日次レポートを集約する
///
/// ストレス・日次統計・アクティビティ・HRV は `dates.target`、睡眠は `dates.sleep` を対象にする。
#[tracing::instrument(skip_all, fields(target = %dates.target, sleep = %dates.sleep))]
pub async fn aggregate_report(
    session: &dyn UpstreamSession,
    dates: ReportDates,
) -> Result<HealthReport, AggregationError> {
    let target = dates.target;

    let (stress, sleep, stats, activities, hrv, metrics) = tokio::join!(
        session.stress(target),
        session.sleep(dates.sleep),
        session.daily_stats(target),
        session.activities(0, RECENT_ACTIVITY_LIMIT),
        session.hrv(target),
        session.user_metrics(),
    );

    if let Some(rejection) = session_rejection(&[
        stress.as_ref().err(),
        sleep.as_ref().err(),
        stats.as_ref().err(),
        activities.as_ref().err(),
        hrv.as_ref().err(),
    ]) {
        return Err(AggregationError::SessionRejected(rejection));
    }

    let stress = settle(Feed::Stress, stress, |data| {
        Ok(Some(normalize_stress(data, target)))
    });
    let sleep = settle(Feed::Sleep, sleep, normalize_sleep);
    let hrv = settle(Feed::Hrv, hrv, |data| Ok(normalize_hrv(data)));
    let activity = build_activity(
        target,
        settle(Feed::DailyStats, stats, |data| Ok(Some(data))),
        settle(Feed::Activities, activities, |data| Ok(Some(data))),
        settle(Feed::UserMetrics, metrics, |data| Ok(Some(data))),
    );

    Ok(HealthReport::assemble(stress, sleep, activity, hrv))
}

/// ストレスの概要だけを取得する
///
/// データが無い、または取得に失敗した場合は `Ok(None)`。
#[tracing::instrument(skip_all, fields(target = %target))]
pub async fn fetch_stress_summary(
    session: &dyn UpstreamSession,
    target: NaiveDate,
) -> Result<Option<StressSummary>, AggregationError> {
    let result = session.stress(target).await;

    if let Err(e) = &result
        && e.is_unauthenticated()
    {
        return Err(AggregationError::SessionRejected(e.clone()));
    }

    Ok(settle(Feed::Stress, result, |data| Ok(Some(normalize_stress(data, target)))).into_option())
}

/// すべての取得が未認証で拒否されていれば、その理由を返す
fn session_rejection(errors: &[Option<&UpstreamError>]) -> Option<UpstreamError> {
    let all_rejected = errors
        .iter()
        .all(|e| e.is_some_and(UpstreamError::is_unauthenticated));
    if all_rejected {
        errors.first().copied().flatten().cloned()
    } else {
        None
    }
}

/// 取得結果を正規化してフィードの結果にする
///
/// `normalize` が `Ok(None)` を返した場合はデータ無し、`Err` の場合は失敗として扱う。
fn settle<T, U>(
    feed: Feed,
    result: Result<Option<T>, UpstreamError>,
    normalize: impl FnOnce(T) -> Result<Option<U>, String>,
) -> FeedOutcome<U> {
    match result {
        Ok(Some(data)) => match normalize(data) {
            Ok(Some(value)) => FeedOutcome::Available(value),
            Ok(None) => {
                tracing::debug!(%feed, "フィードに有効なデータがありません");
                FeedOutcome::Unavailable
            }
            Err(reason) => {
                tracing::warn!(
                    %feed,
                    error.category = "external_service",
                    error.kind = "invalid_response",
                    "フィードの解釈に失敗しました: {}",
                    reason
                );
                FeedOutcome::Failed(reason)
            }
        },
        Ok(None) => {
            tracing::debug!(%feed, "フィードにデータがありません");
            FeedOutcome::Unavailable
        }
        Err(UpstreamError::Unsupported) => {
            tracing::debug!(%feed, "上流クライアントがこのフィードに対応していません");
            FeedOutcome::Unavailable
        }
        Err(e) => {
            tracing::warn!(
                %feed,
                error.category = "external_service",
                error.kind = e.kind(),
                "フィードの取得に失敗しました: {}",
                e
            );
            FeedOutcome::Failed(e.to_string())
        }
    }
}

fn normalize_stress(data: StressData, date: NaiveDate) -> StressSummary {
    StressSummary {
        max_stress: data.max_stress_level.unwrap_or(0),
        avg_stress: data.avg_stress_level.unwrap_or(0),
        date,
    }
}

fn normalize_sleep(data: SleepData) -> Result<Option<SleepReport>, String> {
    let Some(daily) = data.daily_sleep().map_err(|e| e.to_string())? else {
        return Ok(None);
    };

    let (sleep_start, sleep_end) = sleep_window(
        daily.sleep_start_timestamp_local,
        daily.sleep_end_timestamp_local,
    );
    if sleep_start.is_none() {
        tracing::warn!(feed = %Feed::Sleep, "睡眠データに開始・終了時刻がありません");
    }
    let hrv = data.hrv_summary.unwrap_or_default();

    Ok(Some(SleepReport::new(SleepSummary {
        total_sleep_seconds: daily.sleep_time_seconds.unwrap_or(0),
        deep_sleep_seconds: daily.deep_sleep_seconds.unwrap_or(0),
        light_sleep_seconds: daily.light_sleep_seconds.unwrap_or(0),
        rem_sleep_seconds: daily.rem_sleep_seconds.unwrap_or(0),
        awake_seconds: daily.awake_sleep_seconds.unwrap_or(0),
        sleep_start,
        sleep_end,
        sleep_score: sleep_score_label(daily.sleep_score_value.as_ref()),
        average_hrv: hrv.avg_hrv,
        lowest_hrv: hrv.low_hrv,
        highest_hrv: hrv.high_hrv,
    })))
}

fn normalize_hrv(data: HrvData) -> Option<HrvReport> {
    let summary = data.hrv_summary?;
    let readings = data
        .hrv_readings
        .unwrap_or_default()
        .into_iter()
        .filter_map(|reading| {
            Some(HrvReading {
                time:  reading.reading_time_local?,
                value: reading.hrv_value?,
            })
        })
        .collect();

    Some(HrvReport {
        summary: HrvSummary {
            last_night_avg:        summary.last_night_avg,
            last_night_5_min_high: summary.last_night_5_min_high,
            status:                summary.status,
            feedback_phrase:       summary.feedback_phrase,
        },
        readings,
    })
}

/// アクティビティレポートを組み立てる
///
/// 日次統計が取れなかった場合は既定値のまま `privacy_protected` を立てる。
/// 直近アクティビティは日次統計とは独立に対象日で絞り込む。
/// VO2max は身体指標を優先し、無ければ対象日のアクティビティから最初の 0 でない値を使う。
fn build_activity(
    target: NaiveDate,
    stats: FeedOutcome<DailyStats>,
    activities: FeedOutcome<Vec<ActivitySummary>>,
    metrics: FeedOutcome<UserMetrics>,
) -> ActivityReport {
    let mut report = ActivityReport::empty(target);
    let target_date = target.to_string();

    if let Some(vo2_max) = metrics
        .into_option()
        .and_then(|m| m.vo2_max)
        .filter(|v| *v > 0.0)
    {
        report.set_vo2_max(vo2_max, target_date.clone());
    }

    if let FeedOutcome::Available(stats) = stats {
        report.steps = stats.total_steps.unwrap_or(0);
        report.calories_burned = stats.total_kilocalories.unwrap_or(0.0);
        report.active_minutes = stats.moderate_intensity_minutes.unwrap_or(0)
            + stats.vigorous_intensity_minutes.unwrap_or(0);
        report.distance_km = stats.total_distance_meters.unwrap_or(0.0) / 1000.0;
        report.floors_climbed = stats.floors_ascended.unwrap_or(0.0);
        report.active_time_seconds = stats.active_time_seconds.unwrap_or(0);
        report.privacy_protected = false;
    }

    let activities = activities.into_option().unwrap_or_default();
    for activity in activities
        .iter()
        .filter(|a| a.start_date() == Some(target_date.as_str()))
    {
        report.daily_activities.push(DailyActivity::new(
            activity.type_key(),
            activity.duration.unwrap_or(0.0),
        ));

        if report.vo2_max == 0.0
            && let Some(vo2_max) = activity.vo2_max_value.filter(|v| *v > 0.0)
        {
            tracing::debug!(vo2_max, "アクティビティから VO2max を取得しました");
            report.set_vo2_max(vo2_max, target_date.clone());
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use vitalsync_infra::mock::MockUpstreamSession;

    use super::*;

    // --- ヘルパー ---

    fn dates() -> ReportDates {
        ReportDates {
            target: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            sleep:  NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        }
    }

    fn from_json<T: serde::de::DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    fn example_stats() -> DailyStats {
        from_json(json!({
            "totalDistanceMeters": 5000,
            "totalSteps": 8000,
            "totalKilocalories": 300,
            "moderateIntensityMinutes": 20,
            "vigorousIntensityMinutes": 10
        }))
    }

    fn activity(start: &str, type_key: &str, duration: f64, vo2_max: Option<f64>) -> ActivitySummary {
        from_json(json!({
            "startTimeLocal": start,
            "activityType": {"typeKey": type_key},
            "duration": duration,
            "vO2MaxValue": vo2_max
        }))
    }

    async fn aggregate(session: MockUpstreamSession) -> Value {
        let report = aggregate_report(&session, dates()).await.unwrap();
        serde_json::to_value(report).unwrap()
    }

    // --- テスト ---

    #[tokio::test]
    async fn test_全フィードがそろったレポート() {
        let session = MockUpstreamSession {
            stress: Ok(Some(from_json(json!({"maxStressLevel": 88, "avgStressLevel": 31})))),
            sleep: Ok(Some(from_json(json!({
                "dailySleepDTO": {
                    "sleepTimeSeconds": 27000,
                    "deepSleepSeconds": 5400,
                    "lightSleepSeconds": 14400,
                    "remSleepSeconds": 6000,
                    "awakeSleepSeconds": 1200,
                    "sleepStartTimestampLocal": 1_772_320_000_000_i64,
                    "sleepEndTimestampLocal": 1_772_347_000_000_i64,
                    "sleepScoreValue": 84
                },
                "hrvSummary": {"avgHrv": 45, "lowHrv": 32, "highHrv": 68}
            })))),
            daily_stats: Ok(Some(example_stats())),
            activities: Ok(Some(vec![
                activity("2026-03-01 07:00:00", "trail_running", 2730.0, Some(53.0)),
                activity("2026-02-28 18:00:00", "cycling", 3600.0, Some(55.0)),
            ])),
            hrv: Ok(Some(from_json(json!({
                "hrvSummary": {
                    "lastNightAvg": 47,
                    "lastNight5MinHigh": 72,
                    "status": "BALANCED",
                    "feedbackPhrase": "HRV_BALANCED_2"
                },
                "hrvReadings": [
                    {"hrvValue": 44, "readingTimeLocal": "2026-03-01T01:00:00.0"},
                    {"hrvValue": null, "readingTimeLocal": "2026-03-01T01:05:00.0"},
                    {"hrvValue": 51, "readingTimeLocal": null}
                ]
            })))),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(
            report,
            json!({
                "stress": {"max_stress": 88, "avg_stress": 31, "date": "2026-03-01"},
                "sleep": {
                    "summary": {
                        "total_sleep_seconds": 27000,
                        "deep_sleep_seconds": 5400,
                        "light_sleep_seconds": 14400,
                        "rem_sleep_seconds": 6000,
                        "awake_seconds": 1200,
                        "sleep_start": 1_772_320_000_000_i64,
                        "sleep_end": 1_772_347_000_000_i64,
                        "sleep_score": "84",
                        "average_hrv": 45,
                        "lowest_hrv": 32,
                        "highest_hrv": 68
                    },
                    "phases": []
                },
                "activity": {
                    "steps": 8000,
                    "calories_burned": 300.0,
                    "active_minutes": 30,
                    "distance_km": 5.0,
                    "floors_climbed": 0.0,
                    "active_time_seconds": 0,
                    "date": "2026-03-01",
                    "vo2_max": 53.0,
                    "vo2_max_status": "Excellent",
                    "vo2_max_date": "2026-03-01",
                    "daily_activities": [{"type": "Trail Running", "duration_minutes": 45.5}],
                    "mindful_minutes": 0,
                    "privacy_protected": false
                },
                "hrv": {
                    "summary": {
                        "lastNightAvg": 47,
                        "lastNight5MinHigh": 72,
                        "status": "BALANCED",
                        "feedbackPhrase": "HRV_BALANCED_2"
                    },
                    "readings": [{"time": "2026-03-01T01:00:00.0", "value": 44}]
                },
                "heart_rate": null
            })
        );
    }

    #[tokio::test]
    async fn test_ストレス取得が失敗しても他のフィードは計算される() {
        let session = MockUpstreamSession {
            stress: Err(UpstreamError::ServiceUnavailable),
            daily_stats: Ok(Some(example_stats())),
            hrv: Ok(Some(from_json(json!({"hrvSummary": {"lastNightAvg": 40}})))),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(report["stress"], Value::Null);
        assert_eq!(report["activity"]["steps"], json!(8000));
        assert_eq!(report["hrv"]["summary"]["lastNightAvg"], json!(40));
        assert_eq!(report["hrv"]["readings"], json!([]));
    }

    #[tokio::test]
    async fn test_統計の例から距離と活動時間を計算する() {
        let session = MockUpstreamSession {
            daily_stats: Ok(Some(example_stats())),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(report["activity"]["distance_km"], json!(5.0));
        assert_eq!(report["activity"]["active_minutes"], json!(30));
        assert_eq!(report["activity"]["calories_burned"], json!(300.0));
    }

    #[tokio::test]
    async fn test_距離が欠落していても0になる() {
        let session = MockUpstreamSession {
            daily_stats: Ok(Some(from_json(json!({
                "totalSteps": 1200,
                "totalDistanceMeters": null
            })))),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(report["activity"]["distance_km"], json!(0.0));
        assert_eq!(report["activity"]["active_minutes"], json!(0));
        assert_eq!(report["activity"]["privacy_protected"], json!(false));
    }

    #[tokio::test]
    async fn test_対象日のアクティビティが無ければ既定値になる() {
        let session = MockUpstreamSession {
            activities: Ok(Some(vec![activity(
                "2026-02-27 06:00:00",
                "running",
                1800.0,
                Some(50.0),
            )])),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(
            report["activity"],
            json!({
                "steps": 0,
                "calories_burned": 0.0,
                "active_minutes": 0,
                "distance_km": 0.0,
                "floors_climbed": 0.0,
                "active_time_seconds": 0,
                "date": "2026-03-01",
                "vo2_max": 0.0,
                "vo2_max_status": "",
                "vo2_max_date": "",
                "daily_activities": [],
                "mindful_minutes": 0,
                "privacy_protected": true
            })
        );
    }

    #[tokio::test]
    async fn test_統計があり対象日のアクティビティが無ければ一覧は空で権限ありになる() {
        let session = MockUpstreamSession {
            daily_stats: Ok(Some(example_stats())),
            activities: Ok(Some(vec![activity(
                "2026-02-27 06:00:00",
                "running",
                1800.0,
                None,
            )])),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(report["activity"]["daily_activities"], json!([]));
        assert_eq!(report["activity"]["privacy_protected"], json!(false));
        assert_eq!(report["activity"]["steps"], json!(8000));
        assert_eq!(report["activity"]["vo2_max"], json!(0.0));
    }

    #[tokio::test]
    async fn test_小数形式の統計とストレスでもレポートに反映される() {
        let session = MockUpstreamSession {
            stress: Ok(Some(from_json(json!({"maxStressLevel": 88.0, "avgStressLevel": 31.0})))),
            daily_stats: Ok(Some(from_json(json!({
                "totalSteps": 8000.0,
                "moderateIntensityMinutes": 20.0,
                "vigorousIntensityMinutes": 10.0,
                "totalDistanceMeters": 5000.0,
                "activeTimeSeconds": 3600.0
            })))),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(report["stress"]["max_stress"], json!(88));
        assert_eq!(report["activity"]["steps"], json!(8000));
        assert_eq!(report["activity"]["active_minutes"], json!(30));
        assert_eq!(report["activity"]["active_time_seconds"], json!(3600));
        assert_eq!(report["activity"]["privacy_protected"], json!(false));
    }

    #[tokio::test]
    async fn test_統計の権限がなくてもアクティビティは一覧される() {
        let session = MockUpstreamSession {
            daily_stats: Err(UpstreamError::PermissionDenied),
            activities: Ok(Some(vec![activity(
                "2026-03-01 12:00:00",
                "lap_swimming",
                1500.0,
                None,
            )])),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(report["activity"]["privacy_protected"], json!(true));
        assert_eq!(
            report["activity"]["daily_activities"],
            json!([{"type": "Lap Swimming", "duration_minutes": 25.0}])
        );
    }

    #[tokio::test]
    async fn test_vo2maxは身体指標をアクティビティより優先する() {
        let session = MockUpstreamSession {
            activities: Ok(Some(vec![activity(
                "2026-03-01 07:00:00",
                "running",
                1800.0,
                Some(48.0),
            )])),
            user_metrics: Ok(Some(from_json(json!({"vo2Max": 61.0})))),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(report["activity"]["vo2_max"], json!(61.0));
        assert_eq!(report["activity"]["vo2_max_status"], json!("Superior"));
        assert_eq!(report["activity"]["vo2_max_date"], json!("2026-03-01"));
    }

    #[tokio::test]
    async fn test_身体指標が0ならアクティビティの最初の値を使う() {
        let session = MockUpstreamSession {
            activities: Ok(Some(vec![
                activity("2026-03-01 07:00:00", "walking", 600.0, None),
                activity("2026-03-01 08:00:00", "running", 1800.0, Some(36.0)),
                activity("2026-03-01 19:00:00", "running", 1200.0, Some(40.0)),
            ])),
            user_metrics: Ok(Some(from_json(json!({"vo2Max": 0})))),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(report["activity"]["vo2_max"], json!(36.0));
        assert_eq!(report["activity"]["vo2_max_status"], json!("Poor"));
        assert_eq!(report["activity"]["daily_activities"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_空の睡眠記録はnullになる() {
        let session = MockUpstreamSession {
            sleep: Ok(Some(from_json(json!({"dailySleepDTO": {}})))),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(report["sleep"], Value::Null);
    }

    #[tokio::test]
    async fn test_睡眠の終了時刻が無ければ開始時刻もnullになる() {
        let session = MockUpstreamSession {
            sleep: Ok(Some(from_json(json!({
                "dailySleepDTO": {
                    "sleepTimeSeconds": 25000,
                    "sleepStartTimestampLocal": 1_772_320_000_000_i64
                }
            })))),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;
        let summary = &report["sleep"]["summary"];

        assert_eq!(summary["sleep_start"], Value::Null);
        assert_eq!(summary["sleep_end"], Value::Null);
        assert_eq!(summary["sleep_score"], json!("N/A"));
        assert_eq!(summary["average_hrv"], Value::Null);
        assert_eq!(summary["deep_sleep_seconds"], json!(0));
    }

    #[tokio::test]
    async fn test_数値でない睡眠時間はそのフィールドだけ0になる() {
        let session = MockUpstreamSession {
            sleep: Ok(Some(from_json(json!({
                "dailySleepDTO": {"sleepTimeSeconds": "long", "deepSleepSeconds": 4800.0}
            })))),
            stress: Ok(Some(StressData::default())),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(report["sleep"]["summary"]["total_sleep_seconds"], json!(0));
        assert_eq!(report["sleep"]["summary"]["deep_sleep_seconds"], json!(4800));
        assert_eq!(
            report["stress"],
            json!({"max_stress": 0, "avg_stress": 0, "date": "2026-03-01"})
        );
    }

    #[tokio::test]
    async fn test_hrvの計測値0は残す() {
        let session = MockUpstreamSession {
            hrv: Ok(Some(from_json(json!({
                "hrvSummary": {"lastNightAvg": 40},
                "hrvReadings": [
                    {"hrvValue": 0, "readingTimeLocal": "2026-03-01T02:00:00.0"},
                    {"hrvValue": null, "readingTimeLocal": "2026-03-01T02:05:00.0"}
                ]
            })))),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(
            report["hrv"]["readings"],
            json!([{"time": "2026-03-01T02:00:00.0", "value": 0}])
        );
    }

    #[tokio::test]
    async fn test_hrv概要が無ければnullになる() {
        let session = MockUpstreamSession {
            hrv: Ok(Some(from_json(json!({"hrvReadings": []})))),
            ..MockUpstreamSession::empty()
        };

        let report = aggregate(session).await;

        assert_eq!(report["hrv"], Value::Null);
        assert_eq!(report["heart_rate"], Value::Null);
    }

    #[tokio::test]
    async fn test_全フィードが未認証で拒否されると集約は失敗する() {
        let result = aggregate_report(&MockUpstreamSession::rejected(), dates()).await;

        assert_eq!(
            result,
            Err(AggregationError::SessionRejected(UpstreamError::SessionExpired))
        );
    }

    #[tokio::test]
    async fn test_一部のフィードだけが未認証なら集約は成功する() {
        let session = MockUpstreamSession {
            stress: Ok(Some(StressData::default())),
            ..MockUpstreamSession::rejected()
        };

        let report = aggregate(session).await;

        assert_eq!(report["stress"]["max_stress"], json!(0));
        assert_eq!(report["sleep"], Value::Null);
        assert_eq!(report["activity"]["privacy_protected"], json!(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_フィードは並行に取得される() {
        let session = MockUpstreamSession {
            latency: Duration::from_millis(500),
            ..MockUpstreamSession::empty()
        };
        let started = tokio::time::Instant::now();

        aggregate_report(&session, dates()).await.unwrap();

        assert!(started.elapsed() < Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_ストレスのみの取得() {
        let session = MockUpstreamSession {
            stress: Ok(Some(from_json(json!({"maxStressLevel": 70})))),
            ..MockUpstreamSession::empty()
        };

        let summary = fetch_stress_summary(&session, dates().target).await.unwrap();

        assert_eq!(
            summary,
            Some(StressSummary {
                max_stress: 70,
                avg_stress: 0,
                date:       dates().target,
            })
        );
    }

    #[tokio::test]
    async fn test_ストレスのみの取得で未認証ならエラー() {
        let result = fetch_stress_summary(&MockUpstreamSession::rejected(), dates().target).await;

        assert!(matches!(result, Err(AggregationError::SessionRejected(_))));
    }

    #[tokio::test]
    async fn test_ストレスのみの取得で一時的な失敗ならnone() {
        let session = MockUpstreamSession {
            stress: Err(UpstreamError::ServiceUnavailable),
            ..MockUpstreamSession::empty()
        };

        let summary = fetch_stress_summary(&session, dates().target).await.unwrap();

        assert_eq!(summary, None);
    }
}
