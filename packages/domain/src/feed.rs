//! # フィード取得結果
//!
//! 上流の各フィード（ストレス・睡眠・アクティビティ・HRV）の取得結果を表す。
//!
//! 1 つのフィードの失敗が他のフィードやレポート全体を巻き込まないよう、
//! 例外的な制御フローではなく値として結果を持ち回り、最後にレポートへ合成する。

/// フィード 1 件分の取得結果
#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome<T> {
    /// 取得・正規化に成功した
    Available(T),
    /// 上流にデータが存在しない（レポート上は `null`）
    Unavailable,
    /// 取得または正規化に失敗した（レポート上は `null`、理由はログに残す）
    Failed(String),
}

impl<T> FeedOutcome<T> {
    /// レポートに載せる値に変換する
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable | Self::Failed(_) => None,
        }
    }
}
