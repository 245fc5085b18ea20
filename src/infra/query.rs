//! Lenient coercion of query string values.
//!
//! Query parameters arrive as text. Numeric parameters that fail to parse are
//! treated as if they were never sent instead of rejecting the request.

/// Parses a finite number, ignoring surrounding whitespace.
///
/// Blank text reads as zero. Non-numeric text and non-finite values yield [`None`].
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0.0);
    }
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses a position such as an offset or a limit.
///
/// Fractions are truncated toward zero. The sign is kept.
pub fn parse_index(value: &str) -> Option<i64> {
    parse_number(value).map(|n| n.trunc() as i64)
}

/// Returns the text if it is present and non-empty.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_parse_leniently() {
        assert_eq!(Some(20.0), parse_number("20"));
        assert_eq!(Some(2.5), parse_number(" 2.5 "));
        assert_eq!(Some(-3.0), parse_number("-3"));
        assert_eq!(None, parse_number("abc"));
        assert_eq!(Some(0.0), parse_number(""));
        assert_eq!(Some(0.0), parse_number("   "));
        assert_eq!(None, parse_number("inf"));
        assert_eq!(None, parse_number("NaN"));
    }

    #[test]
    fn indices_truncate_toward_zero() {
        assert_eq!(Some(3), parse_index("3"));
        assert_eq!(Some(1), parse_index("1.9"));
        assert_eq!(Some(-1), parse_index("-1.9"));
        assert_eq!(Some(0), parse_index(""));
        assert_eq!(None, parse_index("ten"));
    }

    #[test]
    fn empty_text_is_absent() {
        assert_eq!(None, non_empty(Some("")));
        assert_eq!(None, non_empty(None));
        assert_eq!(Some("witcher"), non_empty(Some("witcher")));
    }
}
