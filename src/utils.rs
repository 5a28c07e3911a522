//! Small helpers shared by the fetch and scrape stages.
//!
//! - Tolerant parsing of scraped snow figures
//! - String truncation for logging response bodies

use tracing::debug;

/// Parse a scraped snow amount, treating anything unparseable as zero.
///
/// Forecast pages render "no snow" in several ways (`"—"`, `"trace"`, empty
/// cells), so a bad cell degrades to `0.0` rather than failing the run.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_amount_or_zero(" 12.5 "), 12.5);
/// assert_eq!(parse_amount_or_zero("trace"), 0.0);
/// ```
pub fn parse_amount_or_zero(text: &str) -> f64 {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            debug!(text = %trimmed, "Unparseable snow amount; counting as zero");
            0.0
        }
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount_or_zero("2"), 2.0);
        assert_eq!(parse_amount_or_zero(" 12.5\n"), 12.5);
        assert_eq!(parse_amount_or_zero("0.5"), 0.5);
    }

    #[test]
    fn test_parse_amount_tolerates_garbage() {
        assert_eq!(parse_amount_or_zero("trace"), 0.0);
        assert_eq!(parse_amount_or_zero("—"), 0.0);
        assert_eq!(parse_amount_or_zero(""), 0.0);
        assert_eq!(parse_amount_or_zero("NaN"), 0.0);
        assert_eq!(parse_amount_or_zero("inf"), 0.0);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let s = "ééééé";
        assert_eq!(truncate_for_log(s, 3), "é…(+8 bytes)");
    }
}
