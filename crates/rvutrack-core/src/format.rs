//! Number and string formatting for display.

/// Format a value with two decimal places, rounding exact halves away from
/// zero ("0.125" -> "0.13") the way browser `toFixed(2)` does. Rust's own
/// formatter rounds those ties to even.
pub fn format_fixed2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // Only multiples of 1/8 that are not multiples of 1/4 sit exactly on a
    // hundredths tie; everything else rounds the same either way.
    let eighths = value * 8.0;
    let is_tie = eighths.fract() == 0.0 && (value * 4.0).fract() != 0.0;
    if is_tie {
        let rounded = (value.abs() * 100.0 + 0.5).floor() / 100.0;
        let text = format!("{:.2}", rounded);
        return if value < 0.0 { format!("-{}", text) } else { text };
    }
    let text = format!("{:.2}", value);
    // Avoid "-0.00" for tiny negative values
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

/// Format a fraction (1.0 == 100%) as a percentage number without the sign.
pub fn format_percent_number(fraction: f64) -> String {
    format_fixed2(fraction * 100.0)
}

/// Format a fraction (1.0 == 100%) as a percentage with a trailing `%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", format_percent_number(fraction))
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fixed2() {
        assert_eq!(format_fixed2(2.21), "2.21");
        assert_eq!(format_fixed2(0.0), "0.00");
        assert_eq!(format_fixed2(11.05), "11.05");
        assert_eq!(format_fixed2(7.79), "7.79");
        assert_eq!(format_fixed2(1234.5), "1234.50");
    }

    #[test]
    fn test_format_fixed2_ties_round_up() {
        assert_eq!(format_fixed2(0.125), "0.13");
        assert_eq!(format_fixed2(0.375), "0.38");
        assert_eq!(format_fixed2(2.625), "2.63");
        assert_eq!(format_fixed2(-0.125), "-0.13");
    }

    #[test]
    fn test_format_fixed2_non_finite() {
        assert_eq!(format_fixed2(f64::INFINITY), "Infinity");
        assert_eq!(format_fixed2(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_fixed2(f64::NAN), "NaN");
        assert_eq!(format_percent(f64::INFINITY), "Infinity%");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.221), "22.10%");
        assert_eq!(format_percent(1.5), "150.00%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("X\u{2011}ray (per view)", 8), "X\u{2011}ray...");
    }
}
