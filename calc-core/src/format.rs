//! # Format 模块
//!
//! 把计算结果格式化为显示屏文本。

/// 格式化计算结果
///
/// - 整数值不带小数部分（`14`、`-2`，`-0.0` 显示为 `0`）
/// - 无穷大显示为 `Infinity` / `-Infinity`，非数显示为 `NaN`
/// - 其他值使用最短往返表示
pub fn format_result(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }

    // `as` 为饱和转换，超出 i64 范围的值不会误判为整数
    let truncated = value as i64;
    if truncated as f64 == value {
        truncated.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_numbers() {
        assert_eq!(format_result(14.0), "14");
        assert_eq!(format_result(-2.0), "-2");
        assert_eq!(format_result(0.0), "0");
        assert_eq!(format_result(-0.0), "0");
        assert_eq!(format_result(512.0), "512");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(format_result(0.5), "0.5");
        assert_eq!(format_result(-1.25), "-1.25");
        assert_eq!(format_result(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(format_result(f64::INFINITY), "Infinity");
        assert_eq!(format_result(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_result(f64::NAN), "NaN");
    }

    #[test]
    fn test_out_of_i64_range() {
        assert_eq!(format_result(1e20), "100000000000000000000");
    }

    #[test]
    fn test_round_trip_through_parse() {
        for value in [3.5, -7.0, f64::INFINITY, f64::NEG_INFINITY] {
            let text = format_result(value);
            assert_eq!(text.parse::<f64>().unwrap(), value);
        }
    }
}
