//! # VO2max 区分
//!
//! VO2max（最大酸素摂取量）の値を 6 段階の区分に分類する。
//! 各区分の下限値は区分に含まれる。

use strum::IntoStaticStr;

/// VO2max の区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum Vo2MaxStatus {
    #[strum(serialize = "Superior")]
    Superior,
    #[strum(serialize = "Excellent")]
    Excellent,
    #[strum(serialize = "Good")]
    Good,
    #[strum(serialize = "Fair")]
    Fair,
    #[strum(serialize = "Poor")]
    Poor,
    #[strum(serialize = "Very Poor")]
    VeryPoor,
}

impl Vo2MaxStatus {
    /// VO2max の値を区分に分類する
    pub fn classify(value: f64) -> Self {
        match value {
            v if v >= 60.0 => Self::Superior,
            v if v >= 52.0 => Self::Excellent,
            v if v >= 45.0 => Self::Good,
            v if v >= 38.0 => Self::Fair,
            v if v >= 35.0 => Self::Poor,
            _ => Self::VeryPoor,
        }
    }

    /// レポートに載せる表示名
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(60.0, Vo2MaxStatus::Superior)]
    #[case(72.5, Vo2MaxStatus::Superior)]
    #[case(52.0, Vo2MaxStatus::Excellent)]
    #[case(59.9, Vo2MaxStatus::Excellent)]
    #[case(45.0, Vo2MaxStatus::Good)]
    #[case(38.0, Vo2MaxStatus::Fair)]
    #[case(35.0, Vo2MaxStatus::Poor)]
    #[case(34.9, Vo2MaxStatus::VeryPoor)]
    #[case(0.0, Vo2MaxStatus::VeryPoor)]
    fn test_区分の下限値はその区分に含まれる(
        #[case] value: f64,
        #[case] expected: Vo2MaxStatus,
    ) {
        assert_eq!(Vo2MaxStatus::classify(value), expected);
    }

    #[rstest]
    #[case(Vo2MaxStatus::Superior, "Superior")]
    #[case(Vo2MaxStatus::VeryPoor, "Very Poor")]
    fn test_表示名(#[case] status: Vo2MaxStatus, #[case] expected: &str) {
        assert_eq!(status.as_str(), expected);
    }
}
