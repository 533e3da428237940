//! Solve time parsing
//!
//! Solve times are exported as `MM:SS[.fraction]` strings. Two entry points
//! exist:
//!
//! - [`parse_mmss`] reports failure as `None`, so callers can tell an
//!   unparsable time apart from a genuine value
//! - [`parse_time_sec`] maps every failure, including a missing value, to
//!   exactly `0.0` seconds
//!
//! A zero duration therefore means "unparsed" whenever the zero-fallback is in
//! use; [`Event::time_parsed`](crate::event::Event::time_parsed) keeps the
//! distinction after preparation.

/// Parses `MM:SS[.fraction]` into seconds.
///
/// The string is split at the first colon; the left part must be an integer
/// minute count and the right part a decimal second count. Surrounding
/// whitespace of each part is ignored.
///
/// # Examples
///
/// ```
/// use cubestats_analysis::duration::parse_mmss;
///
/// assert_eq!(parse_mmss("1:23.45"), Some(83.45));
/// assert_eq!(parse_mmss("0:09.87"), Some(9.87));
/// assert_eq!(parse_mmss("12.34"), None); // no colon
/// assert_eq!(parse_mmss("DNF"), None);
/// ```
#[must_use]
pub fn parse_mmss(s: &str) -> Option<f64> {
    let (min_part, sec_part) = s.split_once(':')?;
    let minutes = min_part.trim().parse::<i64>().ok()?;
    let seconds = sec_part.trim().parse::<f64>().ok()?;
    #[expect(clippy::cast_precision_loss)]
    let total = minutes as f64 * 60.0 + seconds;
    total.is_finite().then_some(total)
}

/// Parses an optional `MM:SS[.fraction]` value, falling back to zero.
///
/// ```
/// use cubestats_analysis::duration::parse_time_sec;
///
/// assert_eq!(parse_time_sec(Some("1:23.45")), 83.45);
/// assert_eq!(parse_time_sec(Some("bad")), 0.0);
/// assert_eq!(parse_time_sec(None), 0.0);
/// ```
#[must_use]
pub fn parse_time_sec(s: Option<&str>) -> f64 {
    s.and_then(parse_mmss).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_and_seconds() {
        assert_eq!(parse_mmss("0:00"), Some(0.0));
        assert_eq!(parse_mmss("2:05"), Some(125.0));
        assert_eq!(parse_mmss(" 1 : 02.5 "), Some(62.5));
    }

    #[test]
    fn test_malformed_input_is_zero() {
        for input in ["", ":", "a:10", "1:b", "1:2:3", "nan", "1:inf"] {
            assert_eq!(parse_time_sec(Some(input)), 0.0, "input {input:?}");
        }
    }

    #[test]
    fn test_fractional_minutes_rejected() {
        assert_eq!(parse_mmss("1.5:00"), None);
    }
}
