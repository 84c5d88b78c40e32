//! # アクティビティ種別の表示名
//!
//! 上流のアクティビティ種別キー（`indoor_cycling` など）を、
//! フロントエンドにそのまま表示できる形（`Indoor Cycling`）に整形する。

/// 種別キーが取得できなかった場合の表示名
pub const UNKNOWN_ACTIVITY_TYPE: &str = "Unknown";

/// 種別キーを表示名に変換する
///
/// アンダースコアを空白に置き換えた後、単語ごとに先頭を大文字・残りを小文字にする。
/// 単語の区切りは英字以外の文字（空白・数字・記号）。
pub fn display_activity_type(type_key: &str) -> String {
    let mut result = String::with_capacity(type_key.len());
    let mut previous_is_letter = false;

    for ch in type_key.chars() {
        let ch = if ch == '_' { ' ' } else { ch };

        if ch.is_alphabetic() {
            if previous_is_letter {
                result.extend(ch.to_lowercase());
            } else {
                result.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(ch);
            previous_is_letter = false;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("running", "Running")]
    #[case("indoor_cycling", "Indoor Cycling")]
    #[case("lap_swimming", "Lap Swimming")]
    #[case("STRENGTH_TRAINING", "Strength Training")]
    #[case("hiit", "Hiit")]
    #[case("e_bike_2x", "E Bike 2X")]
    #[case("Unknown", "Unknown")]
    #[case("", "")]
    fn test_種別キーが表示名に整形される(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(display_activity_type(input), expected);
    }
}
