//! Month/year date tokens.
//!
//! Imported date cells carry month/year granularity only, as `MM/YYYY` or
//! `YYYY`. The format check is a permissive shape check, not a calendar
//! validator: the month field is any two digits, so `13/2024` passes.
//! Ordering treats a bare `YYYY` as January of that year.

use once_cell::sync::Lazy;
use regex::Regex;

static MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{4}$").expect("month/year pattern"));
static YEAR_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("year pattern"));

/// True iff the token is `MM/YYYY` or `YYYY`.
pub fn is_valid_date_token(token: &str) -> bool {
    MONTH_YEAR.is_match(token) || YEAR_ONLY.is_match(token)
}

/// Ordering point for a token: `(year, zero-based month)`.
///
/// Used only for comparisons, never displayed. The month is signed so that
/// an unchecked `00` month orders below January instead of wrapping.
/// Returns `None` for unrecognized tokens.
pub fn to_comparable(token: &str) -> Option<(i32, i32)> {
    if MONTH_YEAR.is_match(token) {
        let (month, year) = token.split_once('/')?;
        let month: i32 = month.parse().ok()?;
        let year: i32 = year.parse().ok()?;
        Some((year, month - 1))
    } else if YEAR_ONLY.is_match(token) {
        let year: i32 = token.parse().ok()?;
        Some((year, 0))
    } else {
        None
    }
}

/// True iff both tokens are recognized and `a` orders at or before `b`.
///
/// An invalid token makes this false rather than an error; callers surface
/// format findings independently and must not rely on this predicate for
/// them.
pub fn is_before_or_same(a: &str, b: &str) -> bool {
    match (to_comparable(a), to_comparable(b)) {
        (Some(a), Some(b)) => a <= b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_both_formats() {
        assert!(is_valid_date_token("01/2020"));
        assert!(is_valid_date_token("12/1999"));
        assert!(is_valid_date_token("2020"));
        // Month field is not range-checked
        assert!(is_valid_date_token("13/2024"));
        assert!(is_valid_date_token("00/2024"));
    }

    #[test]
    fn test_rejects_everything_else() {
        assert!(!is_valid_date_token(""));
        assert!(!is_valid_date_token("1/2020"));
        assert!(!is_valid_date_token("01/20"));
        assert!(!is_valid_date_token("2020-01"));
        assert!(!is_valid_date_token("01/2020 "));
        assert!(!is_valid_date_token("202"));
        assert!(!is_valid_date_token("20200"));
        assert!(!is_valid_date_token("January 2020"));
    }

    #[test]
    fn test_year_only_is_january() {
        // Jan-2020 vs Jan-2020: equal points compare as before-or-same
        assert!(is_before_or_same("01/2020", "2020"));
        assert!(is_before_or_same("2020", "01/2020"));
        assert!(!is_before_or_same("02/2020", "2020"));
    }

    #[test]
    fn test_permissive_month_ordering() {
        // 13/2020 orders within 2020, before anything in 2021
        assert!(is_before_or_same("13/2020", "01/2021"));
        assert!(!is_before_or_same("01/2021", "13/2020"));
    }

    #[test]
    fn test_invalid_tokens_compare_false() {
        assert!(!is_before_or_same("garbage", "01/2020"));
        assert!(!is_before_or_same("01/2020", "garbage"));
        assert!(!is_before_or_same("", ""));
    }

    #[test]
    fn test_comparable_points() {
        assert_eq!(to_comparable("03/2021"), Some((2021, 2)));
        assert_eq!(to_comparable("2021"), Some((2021, 0)));
        assert_eq!(to_comparable("00/2021"), Some((2021, -1)));
        assert_eq!(to_comparable("3/2021"), None);
    }
}
