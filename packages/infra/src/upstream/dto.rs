//! # 上流サービスのワイヤ形式
//!
//! 上流が返す JSON をそのまま受け取るための型。
//! どの階層のどのフィールドも欠落・`null` があり得るため、すべて `Option` にしている。
//!
//! フィールド名は上流の表記（camelCase）に合わせる。
//!
//! 数値フィールドは `8000` と `8000.0` のどちらの形でも届く。型が合わない値は
//! 構造体全体の失敗にせず、そのフィールドだけを `None` にする。

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// 整数フィールドを寛容に読む（小数は四捨五入、数値以外は `None`）
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_f64().map(|f| f.round() as i64))
    }))
}

/// 小数フィールドを寛容に読む（数値以外は `None`）
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64))
}

/// ストレスデータ
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressData {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub max_stress_level: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub avg_stress_level: Option<i64>,
}

/// 睡眠データ
///
/// `dailySleepDTO` は空オブジェクトで返ることがあるため、
/// まず [`Value`] で受け取り [`SleepData::daily_sleep`] で解釈する。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepData {
    #[serde(rename = "dailySleepDTO")]
    pub daily_sleep_dto: Option<Value>,
    pub hrv_summary:     Option<SleepHrvSummary>,
}

impl SleepData {
    /// 日次の睡眠記録を取り出す
    ///
    /// 記録が存在しない、`null`、または空オブジェクトの場合は `Ok(None)`。
    pub fn daily_sleep(&self) -> Result<Option<DailySleep>, serde_json::Error> {
        match &self.daily_sleep_dto {
            Some(Value::Object(map)) if !map.is_empty() => {
                serde_json::from_value(Value::Object(map.clone())).map(Some)
            }
            _ => Ok(None),
        }
    }
}

/// 日次の睡眠記録
///
/// 開始・終了時刻とスコアは上流によって数値・文字列どちらもあり得るため [`Value`] のまま持つ。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySleep {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub sleep_time_seconds:          Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub deep_sleep_seconds:          Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub light_sleep_seconds:         Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub rem_sleep_seconds:           Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub awake_sleep_seconds:         Option<i64>,
    pub sleep_start_timestamp_local: Option<Value>,
    pub sleep_end_timestamp_local:   Option<Value>,
    pub sleep_score_value:           Option<Value>,
}

/// 睡眠中の HRV
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepHrvSummary {
    pub avg_hrv:  Option<Number>,
    pub low_hrv:  Option<Number>,
    pub high_hrv: Option<Number>,
}

/// 日次統計（ユーザーサマリ）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_steps:                Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_kilocalories:         Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub moderate_intensity_minutes: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub vigorous_intensity_minutes: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_distance_meters:      Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub floors_ascended:            Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub active_time_seconds:        Option<i64>,
}

/// アクティビティ一覧の 1 件
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub start_time_local: Option<String>,
    /// `{"typeKey": "..."}` 形式を想定するが、それ以外の形も受け付ける
    pub activity_type:    Option<Value>,
    /// 所要時間（秒）
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration:         Option<f64>,
    #[serde(rename = "vO2MaxValue", default, deserialize_with = "lenient_f64")]
    pub vo2_max_value:    Option<f64>,
}

impl ActivitySummary {
    /// 開始時刻（ローカル）の日付部分（最初の空白より前）
    pub fn start_date(&self) -> Option<&str> {
        self.start_time_local
            .as_deref()
            .and_then(|s| s.split_whitespace().next())
    }

    /// アクティビティ種別キー
    pub fn type_key(&self) -> Option<&str> {
        self.activity_type
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|obj| obj.get("typeKey"))
            .and_then(Value::as_str)
    }

    /// アクティビティ一覧を 1 件ずつ解釈する
    ///
    /// `null` の要素と解釈できない要素は読み飛ばす。
    pub fn parse_list(items: Vec<Value>) -> Vec<Self> {
        items
            .into_iter()
            .filter(|item| !item.is_null())
            .filter_map(|item| match serde_json::from_value::<Self>(item) {
                Ok(activity) => Some(activity),
                Err(e) => {
                    tracing::warn!(error = %e, "アクティビティを解釈できないため読み飛ばします");
                    None
                }
            })
            .collect()
    }
}

/// HRV データ
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrvData {
    pub hrv_summary:  Option<HrvSummaryData>,
    pub hrv_readings: Option<Vec<HrvReadingData>>,
}

/// HRV の概要
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrvSummaryData {
    pub last_night_avg:        Option<Number>,
    #[serde(rename = "lastNight5MinHigh")]
    pub last_night_5_min_high: Option<Number>,
    pub status:                Option<String>,
    pub feedback_phrase:       Option<String>,
}

/// HRV の計測値
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrvReadingData {
    pub hrv_value:          Option<Number>,
    pub reading_time_local: Option<String>,
}

/// ユーザーの身体指標
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserMetrics {
    #[serde(rename = "vo2Max", default, deserialize_with = "lenient_f64")]
    pub vo2_max: Option<f64>,
}
