//! # Clock（時刻プロバイダ）
//!
//! `Local::now()` の直接呼び出しを置き換え、テストで固定時刻を注入可能にするための抽象化。
//!
//! 日付の既定値（「今日」「昨日」）はサーバーのローカルタイムゾーンで決める。

use chrono::{DateTime, Local, NaiveDate};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// サーバーローカルの今日の日付
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// 固定時刻を返すテスト用実装
pub struct FixedClock {
    now: DateTime<Local>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.now
    }
}
