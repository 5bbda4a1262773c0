//! Text-to-price parsing heuristics.
//!
//! Storefront price fragments come with currency symbols, non-breaking
//! spaces, footnote asterisks and locale-dependent separators. The rules
//! here are deliberately simple: the first `digits, separator, exactly two
//! digits` group wins and the two digits are cents, no matter whether the
//! separator is a comma or a dot. Thousands separators are NOT handled --
//! `"1.234,56"` parses as `234.56`. That is a documented simplification,
//! not a bug: the supported price containers never carry grouped amounts
//! and the plausibility bounds in the extractor catch the rest.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// `digits [,.] exactly-two-digits` not followed by a further digit.
static DECIMAL_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)[.,](\d{2})(?:\D|$)").unwrap());

/// First run of digits, for integer-only snippets such as `a-price-whole`.
static WHOLE_PRICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Parses an arbitrary text fragment into a price.
///
/// Returns `None` for unparsable or non-positive input; malformed text is
/// never an error.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let clean: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '*')
        .collect();

    let candidate = parse_decimal(&clean).or_else(|| parse_whole(&clean))?;

    (candidate > Decimal::ZERO).then_some(candidate)
}

fn parse_decimal(clean: &str) -> Option<Decimal> {
    let captures = DECIMAL_PRICE.captures(clean)?;
    let whole = captures.get(1)?.as_str();
    let cents = captures.get(2)?.as_str();
    Decimal::from_str(&format!("{whole}.{cents}")).ok()
}

fn parse_whole(clean: &str) -> Option<Decimal> {
    let digits = WHOLE_PRICE.find(clean)?;
    Decimal::from_str(digits.as_str()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[rstest]
    #[case("499,99 €", "499.99")]
    #[case("499.99", "499.99")]
    #[case("EUR 1.049,00", "49.00")] // grouped thousands are intentionally misread
    #[case("1.234,56", "234.56")] // two-trailing-digit rule, not locale parsing
    #[case("  79,90\u{a0}€* ", "79.90")]
    #[case("19,99€", "19.99")]
    fn parses_two_decimal_amounts(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_price(input), Some(dec(expected)));
    }

    #[rstest]
    #[case("499", "499")]
    #[case("1 299", "1299")] // whitespace stripped before the digit scan
    #[case("ab 549 cd", "549")]
    fn falls_back_to_whole_number(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_price(input), Some(dec(expected)));
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("€ --")]
    #[case("0,00 €")] // non-positive is rejected, not returned as zero
    #[case("0")]
    fn rejects_garbage_and_non_positive(#[case] input: &str) {
        assert_eq!(parse_price(input), None);
    }

    #[test]
    fn decimal_rule_wins_over_whole_number_fallback() {
        // "549" would match the fallback, but the two-decimal group is primary.
        assert_eq!(parse_price("statt 549: jetzt 499,99"), Some(dec("499.99")));
    }
}
