//! # ユースケース
//!
//! ハンドラから呼ばれる処理本体。ハンドラは入力の検証とレスポンスへの変換に専念する。
//!
//! - [`aggregate`] - 上流の各フィードを取得・正規化して日次レポートにまとめる

pub mod aggregate;

pub use aggregate::{AggregationError, aggregate_report, fetch_stress_summary};
