//! Numeric-aware value equality.
//!
//! A value is numeric when it is a number or a string that is entirely a
//! number literal. Two numeric values are equal when their magnitudes are
//! equal, whatever their representation (`"69"`, `69`, `69.0`). Every other
//! pair is equal only when both type and value match; a numeric value never
//! equals a non-numeric one (`null` vs `0` is a change).

use crate::spooky_value::{SpookyNumber, SpookyValue};

/// Canonical magnitude of a numeric value.
///
/// Integral magnitudes always land in `Int`, so `Int` vs `Float` is never equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    pub fn from_f64(f: f64) -> Self {
        // 2^127 is exactly representable; anything below it fits in i128.
        if f.is_finite() && f.fract() == 0.0 && f.abs() < i128::MAX as f64 {
            Numeric::Int(f as i128)
        } else {
            Numeric::Float(f)
        }
    }

    pub fn from_number(n: SpookyNumber) -> Self {
        match n {
            SpookyNumber::I64(i) => Numeric::Int(i as i128),
            SpookyNumber::U64(u) => Numeric::Int(u as i128),
            SpookyNumber::F64(f) => Numeric::from_f64(f),
        }
    }
}

/// Strict number grammar: `[+-]? (digits ('.' digits?)? | '.' digits) ([eE] [+-]? digits)?`.
///
/// Returns whether the literal is integral-looking (no fraction, no exponent)
/// or `None` when `s` is not a number at all.
fn scan_number(s: &str) -> Option<bool> {
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    let mut integral = true;
    if i < b.len() && b[i] == b'.' {
        integral = false;
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if i < b.len() && matches!(b[i], b'e' | b'E') {
        integral = false;
        i += 1;
        if i < b.len() && matches!(b[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }

    (i == b.len()).then_some(integral)
}

/// Parse a string that is fully a number literal.
pub fn parse_numeric_str(s: &str) -> Option<Numeric> {
    let integral = scan_number(s)?;
    if integral {
        if let Ok(i) = s.parse::<i128>() {
            return Some(Numeric::Int(i));
        }
    }
    // "5." is accepted by the grammar but not by every float parser.
    let trimmed = s.strip_suffix('.').unwrap_or(s);
    trimmed.parse::<f64>().ok().map(Numeric::from_f64)
}

pub fn is_numeric(v: &SpookyValue) -> bool {
    as_numeric(v).is_some()
}

pub fn as_numeric(v: &SpookyValue) -> Option<Numeric> {
    match v {
        SpookyValue::Number(n) => Some(Numeric::from_number(*n)),
        SpookyValue::Str(s) => parse_numeric_str(s),
        SpookyValue::Null | SpookyValue::Bool(_) => None,
    }
}

/// Numeric-aware equality shared by change detection and unindexed lookups.
pub fn loose_eq(a: &SpookyValue, b: &SpookyValue) -> bool {
    match (as_numeric(a), as_numeric(b)) {
        (Some(x), Some(y)) => x == y,
        (None, None) => match (a, b) {
            (SpookyValue::Null, SpookyValue::Null) => true,
            (SpookyValue::Bool(x), SpookyValue::Bool(y)) => x == y,
            (SpookyValue::Str(x), SpookyValue::Str(y)) => x == y,
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_string_equals_int() {
        assert!(loose_eq(&SpookyValue::from("69"), &SpookyValue::from(69i64)));
        assert!(loose_eq(&SpookyValue::from(69.0), &SpookyValue::from(69i64)));
        assert!(loose_eq(&SpookyValue::from("6.9e1"), &SpookyValue::from(69u64)));
        assert!(loose_eq(&SpookyValue::from("007"), &SpookyValue::from(7i64)));
    }

    #[test]
    fn test_numeric_mismatch() {
        assert!(!loose_eq(&SpookyValue::from(69i64), &SpookyValue::from(4.56)));
        assert!(!loose_eq(&SpookyValue::from("69"), &SpookyValue::from("70")));
    }

    #[test]
    fn test_null_is_not_zero() {
        assert!(!loose_eq(&SpookyValue::Null, &SpookyValue::from(0i64)));
        assert!(!loose_eq(&SpookyValue::Null, &SpookyValue::from("")));
        assert!(!loose_eq(&SpookyValue::from(false), &SpookyValue::from(0i64)));
        assert!(loose_eq(&SpookyValue::Null, &SpookyValue::Null));
    }

    #[test]
    fn test_non_numeric_strict() {
        assert!(loose_eq(&SpookyValue::from("abc"), &SpookyValue::from("abc")));
        assert!(!loose_eq(&SpookyValue::from("abc"), &SpookyValue::from("ABC")));
        assert!(!loose_eq(&SpookyValue::from(true), &SpookyValue::from("1")));
    }

    #[test]
    fn test_numeric_grammar() {
        for s in ["0", "-1", "+2", "1.5", ".5", "5.", "1e10", "1E-3", "-0.0"] {
            assert!(parse_numeric_str(s).is_some(), "{s} should be numeric");
        }
        for s in ["", " 1", "1 ", "1e", "e1", ".", "+", "0x10", "inf", "NaN", "1_000", "1.2.3"] {
            assert!(parse_numeric_str(s).is_none(), "{s:?} should not be numeric");
        }
    }

    #[test]
    fn test_integral_floats_canonicalize() {
        assert_eq!(Numeric::from_f64(2.0), Numeric::Int(2));
        assert_eq!(Numeric::from_f64(-0.0), Numeric::Int(0));
        assert!(matches!(Numeric::from_f64(2.5), Numeric::Float(_)));
        assert_eq!(parse_numeric_str("1e3"), Some(Numeric::Int(1000)));
    }

    #[test]
    fn test_large_integers_exact() {
        let a = SpookyValue::from(u64::MAX);
        let b = SpookyValue::from(u64::MAX.to_string());
        assert!(loose_eq(&a, &b));
        assert!(!loose_eq(&a, &SpookyValue::from((u64::MAX - 1).to_string())));
    }
}
