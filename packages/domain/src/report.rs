//! # 日次ヘルスレポート
//!
//! 上流の各フィードを正規化した結果をまとめた、クライアントに返すレポートの形。
//!
//! トップレベルの 5 フィールド（`stress` / `sleep` / `activity` / `hrv` / `heart_rate`）は
//! 常にすべて出力する。取得できなかったフィードは `null` になる。

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Number, Value};

use crate::{
    activity_type::{UNKNOWN_ACTIVITY_TYPE, display_activity_type},
    feed::FeedOutcome,
    vo2_max::Vo2MaxStatus,
};

/// 睡眠スコアが取得できなかった場合の表示
pub const SLEEP_SCORE_NOT_AVAILABLE: &str = "N/A";

/// 日次ヘルスレポート
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub stress:     Option<StressSummary>,
    pub sleep:      Option<SleepReport>,
    pub activity:   Option<ActivityReport>,
    pub hrv:        Option<HrvReport>,
    /// 心拍数フィードは未接続のため常に `null`
    pub heart_rate: Option<Value>,
}

impl HealthReport {
    /// フィードごとの取得結果からレポートを組み立てる
    ///
    /// アクティビティは統計が取れなくても既定値で埋めるため、常に出力される。
    pub fn assemble(
        stress: FeedOutcome<StressSummary>,
        sleep: FeedOutcome<SleepReport>,
        activity: ActivityReport,
        hrv: FeedOutcome<HrvReport>,
    ) -> Self {
        Self {
            stress:     stress.into_option(),
            sleep:      sleep.into_option(),
            activity:   Some(activity),
            hrv:        hrv.into_option(),
            heart_rate: None,
        }
    }
}

/// ストレスの概要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StressSummary {
    pub max_stress: i64,
    pub avg_stress: i64,
    pub date:       NaiveDate,
}

/// 睡眠レポート
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepReport {
    pub summary: SleepSummary,
    /// 睡眠ステージの時系列。上流から取得していないため常に空。
    pub phases:  Vec<Value>,
}

impl SleepReport {
    pub fn new(summary: SleepSummary) -> Self {
        Self {
            summary,
            phases: Vec::new(),
        }
    }
}

/// 睡眠の概要
///
/// 開始・終了時刻は上流の値（エポックミリ秒または文字列）をそのまま返す。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepSummary {
    pub total_sleep_seconds: i64,
    pub deep_sleep_seconds:  i64,
    pub light_sleep_seconds: i64,
    pub rem_sleep_seconds:   i64,
    pub awake_seconds:       i64,
    pub sleep_start:         Option<Value>,
    pub sleep_end:           Option<Value>,
    pub sleep_score:         String,
    pub average_hrv:         Option<Number>,
    pub lowest_hrv:          Option<Number>,
    pub highest_hrv:         Option<Number>,
}

/// 睡眠の開始・終了時刻の組
///
/// 片方だけが存在する状態を作らないよう、両方そろったときだけ値を持つ。
pub fn sleep_window(start: Option<Value>, end: Option<Value>) -> (Option<Value>, Option<Value>) {
    match (start.filter(is_present), end.filter(is_present)) {
        (Some(start), Some(end)) => (Some(start), Some(end)),
        _ => (None, None),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

/// 睡眠スコアを表示用の文字列にする
///
/// 文字列はそのまま、数値などはその表記で返す。存在しなければ `"N/A"`。
pub fn sleep_score_label(score: Option<&Value>) -> String {
    match score {
        None | Some(Value::Null) => SLEEP_SCORE_NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// アクティビティレポート
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityReport {
    pub steps:               i64,
    pub calories_burned:     f64,
    pub active_minutes:      i64,
    pub distance_km:         f64,
    pub floors_climbed:      f64,
    pub active_time_seconds: i64,
    pub date:                NaiveDate,
    pub vo2_max:             f64,
    pub vo2_max_status:      String,
    pub vo2_max_date:        String,
    pub daily_activities:    Vec<DailyActivity>,
    pub mindful_minutes:     i64,
    /// 日次統計が取得できなかった（権限不足を含む）場合に真
    pub privacy_protected:   bool,
}

impl ActivityReport {
    /// すべての値を既定値（0 / 空）で埋めたレポート
    ///
    /// 統計が取得できるまではプライバシー保護扱いにしておく。
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            steps: 0,
            calories_burned: 0.0,
            active_minutes: 0,
            distance_km: 0.0,
            floors_climbed: 0.0,
            active_time_seconds: 0,
            date,
            vo2_max: 0.0,
            vo2_max_status: String::new(),
            vo2_max_date: String::new(),
            daily_activities: Vec::new(),
            mindful_minutes: 0,
            privacy_protected: true,
        }
    }

    /// VO2max の値と取得元の日付を記録する
    pub fn set_vo2_max(&mut self, value: f64, date: impl Into<String>) {
        self.vo2_max = value;
        self.vo2_max_status = Vo2MaxStatus::classify(value).as_str().to_string();
        self.vo2_max_date = date.into();
    }
}

/// その日に記録されたアクティビティ 1 件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyActivity {
    #[serde(rename = "type")]
    pub activity_type:    String,
    pub duration_minutes: f64,
}

impl DailyActivity {
    /// 種別キーと秒単位の所要時間から作成する
    ///
    /// 所要時間は分に換算し、小数第 1 位に丸める（偶数丸め）。
    pub fn new(type_key: Option<&str>, duration_seconds: f64) -> Self {
        let minutes = duration_seconds / 60.0;
        Self {
            activity_type:    display_activity_type(type_key.unwrap_or(UNKNOWN_ACTIVITY_TYPE)),
            duration_minutes: (minutes * 10.0).round_ties_even() / 10.0,
        }
    }
}

/// HRV（心拍変動）レポート
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HrvReport {
    pub summary:  HrvSummary,
    pub readings: Vec<HrvReading>,
}

/// HRV の概要
///
/// キー名は上流の表記（camelCase）のまま返す。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HrvSummary {
    pub last_night_avg:        Option<Number>,
    #[serde(rename = "lastNight5MinHigh")]
    pub last_night_5_min_high: Option<Number>,
    pub status:                Option<String>,
    pub feedback_phrase:       Option<String>,
}

/// HRV の計測値 1 件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HrvReading {
    pub time:  String,
    pub value: Number,
}
