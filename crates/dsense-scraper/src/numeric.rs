//! Normalization of human-formatted numeric text into typed values.
//!
//! Two single-purpose parsers, each scoped to the one formatting
//! convention its source uses: decimal-comma prices for the marketplace
//! (`"129,99 zł"`) and magnitude-suffixed counts for the social
//! platforms (`"1.2M"`). Neither is a general locale parser and neither
//! should be handed the other source's text.
//!
//! Both are pure and total over their failure case: bad input yields
//! `None`, never a panic or an error past this boundary.

/// Currency markers stripped before price parsing.
const CURRENCY_MARKERS: &[&str] = &["zł", "PLN"];

/// Magnitude suffixes recognized by [`parse_count`], with their factors.
const MAGNITUDE_SUFFIXES: &[(char, i64)] = &[('K', 1_000), ('M', 1_000_000), ('B', 1_000_000_000)];

/// Parses a decimal-comma marketplace price, e.g. `"129,99 zł"` or
/// `"1 299,00 zł"`.
///
/// Strips currency markers and all whitespace (including non-breaking
/// thousands separators), converts the decimal comma to a point, and
/// parses the remainder. Returns `None` for anything that does not
/// reduce to a non-negative finite number. The result is unrounded;
/// callers round to 2 fraction digits where precision matters.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let mut cleaned = text.to_string();
    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    let cleaned: String = cleaned
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let price = cleaned.parse::<f64>().ok()?;
    (price.is_finite() && price >= 0.0).then_some(price)
}

/// Parses a magnitude-suffixed count, e.g. `"1.2M"`, `"45.3K"`, `"7"`.
///
/// The suffix (K/M/B, case-insensitive) multiplies the mantissa by
/// 10³/10⁶/10⁹; a bare number passes through with factor 1. The product
/// truncates to an integer. Returns `None` when the mantissa does not
/// parse or the result would be negative.
#[must_use]
pub fn parse_count(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (mantissa_text, factor) = match trimmed.chars().next_back() {
        Some(last) => {
            let upper = last.to_ascii_uppercase();
            match MAGNITUDE_SUFFIXES.iter().find(|(c, _)| *c == upper) {
                Some((_, factor)) => (&trimmed[..trimmed.len() - last.len_utf8()], *factor),
                None => (trimmed, 1),
            }
        }
        None => return None,
    };

    let mantissa = mantissa_text.trim().parse::<f64>().ok()?;
    if !mantissa.is_finite() || mantissa < 0.0 {
        return None;
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "truncation toward zero is the documented contract"
    )]
    let count = (mantissa * factor as f64) as i64;
    Some(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_with_currency_marker() {
        assert_eq!(parse_price("129,99 zł"), Some(129.99));
    }

    #[test]
    fn price_with_thousands_separator() {
        assert_eq!(parse_price("1 299,00 zł"), Some(1299.00));
    }

    #[test]
    fn price_with_nbsp_separator() {
        assert_eq!(parse_price("1\u{a0}299,00\u{a0}zł"), Some(1299.00));
    }

    #[test]
    fn price_with_pln_marker() {
        assert_eq!(parse_price("49,50 PLN"), Some(49.50));
    }

    #[test]
    fn price_plain_number() {
        assert_eq!(parse_price("15,00"), Some(15.00));
    }

    #[test]
    fn price_garbage_fails() {
        assert_eq!(parse_price("not a price"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("zł"), None);
    }

    #[test]
    fn price_negative_fails() {
        assert_eq!(parse_price("-5,00 zł"), None);
    }

    #[test]
    fn count_millions() {
        assert_eq!(parse_count("1.2M"), Some(1_200_000));
    }

    #[test]
    fn count_thousands() {
        assert_eq!(parse_count("45.3K"), Some(45_300));
    }

    #[test]
    fn count_billions() {
        assert_eq!(parse_count("2B"), Some(2_000_000_000));
    }

    #[test]
    fn count_plain_integer() {
        assert_eq!(parse_count("7"), Some(7));
    }

    #[test]
    fn count_lowercase_suffix() {
        assert_eq!(parse_count("3.5m"), Some(3_500_000));
    }

    #[test]
    fn count_truncates_fraction() {
        // 1.2345K = 1234.5, truncated toward zero.
        assert_eq!(parse_count("1.2345K"), Some(1_234));
    }

    #[test]
    fn count_garbage_fails() {
        assert_eq!(parse_count("a lot"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("M"), None);
    }

    #[test]
    fn count_negative_fails() {
        assert_eq!(parse_count("-3K"), None);
    }
}
