//! # レポート対象日
//!
//! リクエストで指定された日付と現在時刻から、
//! レポートの対象日と睡眠データの参照日を決める。
//!
//! 睡眠は「起床した日の前夜」に属するため、睡眠日は既定で対象日の前日になる。

use chrono::{Days, NaiveDate};

use crate::{DomainError, clock::Clock};

/// 日付の書式（`YYYY-MM-DD`）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `YYYY-MM-DD` 形式の日付をパースする
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        DomainError::Validation(format!("Invalid {field}: expected YYYY-MM-DD, got {value:?}"))
    })
}

/// レポートの対象日と睡眠日
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDates {
    /// ストレス・アクティビティ・HRV の対象日
    pub target: NaiveDate,
    /// 睡眠データの参照日
    pub sleep:  NaiveDate,
}

impl ReportDates {
    /// リクエストの指定から対象日と睡眠日を決める
    ///
    /// - `date` 未指定: 今日（`use_yesterday` が真なら昨日）
    /// - `sleep_date` 未指定: 対象日の前日
    pub fn resolve(
        date: Option<&str>,
        sleep_date: Option<&str>,
        use_yesterday: bool,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let target = match date {
            Some(value) => parse_date("date", value)?,
            None if use_yesterday => previous_day(clock.today()),
            None => clock.today(),
        };
        let sleep = match sleep_date {
            Some(value) => parse_date("sleep_date", value)?,
            None => previous_day(target),
        };

        Ok(Self { target, sleep })
    }
}

fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}
