//! Keyframe selector to numeric offset conversion.

/// Map a keyframe selector token to a percentage offset.
///
/// `from` and `to` are `0` and `100`. Any other token is read as the longest
/// numeric prefix it starts with, so `"50%"` is `50`. A token without a numeric
/// prefix gives NaN, which callers pass through unchanged.
pub fn normalize(token: &str) -> f64 {
    match token {
        "from" => 0.,
        "to" => 100.,
        _ => parse_float_prefix(token),
    }
}

/// Parse the leading decimal number of `s`, ignoring whatever follows it.
///
/// Leading whitespace is skipped. The number may carry a sign, a fractional part
/// and an exponent, or be the literal `Infinity`.
pub fn parse_float_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return if b[0] == b'-' { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_end = digits_from(i);
    let mut has_digits = int_end > i;
    i = int_end;
    if b.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        if has_digits || frac_end > i + 1 {
            has_digits = true;
            i = frac_end;
        }
    }
    if !has_digits {
        return f64::NAN;
    }

    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    s[..i].parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(normalize("from"), 0.);
        assert_eq!(normalize("to"), 100.);
    }

    #[test]
    fn percentages() {
        assert_eq!(normalize("0%"), 0.);
        assert_eq!(normalize("50%"), 50.);
        assert_eq!(normalize("100%"), 100.);
        assert_eq!(normalize("12.5%"), 12.5);
        assert_eq!(normalize(".5%"), 0.5);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert!(normalize("FROM").is_nan());
        assert!(normalize("To").is_nan());
    }

    #[test]
    fn no_numeric_prefix_is_nan() {
        assert!(normalize("").is_nan());
        assert!(normalize("cover").is_nan());
        assert!(normalize("%50").is_nan());
        assert!(normalize(".").is_nan());
        assert!(normalize("-").is_nan());
    }

    #[test]
    fn prefix_rules() {
        assert_eq!(parse_float_prefix("  42abc"), 42.);
        assert_eq!(parse_float_prefix("-3.5%"), -3.5);
        assert_eq!(parse_float_prefix("+7"), 7.);
        assert_eq!(parse_float_prefix("5."), 5.);
        assert_eq!(parse_float_prefix("1e2%"), 100.);
        assert_eq!(parse_float_prefix("1e%"), 1.);
        assert_eq!(parse_float_prefix("2E-1"), 0.2);
        assert_eq!(parse_float_prefix("1.2.3"), 1.2);
        assert_eq!(parse_float_prefix("Infinity%"), f64::INFINITY);
        assert_eq!(parse_float_prefix("-Infinity"), f64::NEG_INFINITY);
    }
}
