//! Extracts the displayed price from fetched product-page HTML.
//!
//! Strategy order matters: structural selectors for the known price
//! containers run first, most reliable first, and the first plausible hit
//! short-circuits. Only when no container yields a plausible price does the
//! whole-document text scan run. A page without any plausible price is a
//! normal outcome (layout change, bot-detection interstitial, out of
//! stock), so the result is an `Option`, never an error.

use regex::Regex;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use std::str::FromStr;
use std::sync::LazyLock;

use crate::parser::parse_price;

/// Price containers of the supported storefront, most specific first.
///
/// Update process: when extraction starts failing, capture an HTML sample,
/// adjust this list, and add a fixture test.
static STRUCTURAL_RULES: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "span.a-price span.a-offscreen",
        "span#priceblock_ourprice",
        "span#priceblock_dealprice",
        "span.a-offscreen",
        "span.a-price-whole",
    ]
    .iter()
    .map(|rule| Selector::parse(rule).unwrap())
    .collect()
});

/// Two-decimal amount next to a currency marker: `89,99 €` or `EUR 59,90`.
static CURRENCY_ADJACENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:EUR|€)\s*(\d+[.,]\d{2})|(\d+[.,]\d{2})\s*(?:€|EUR)").unwrap()
});

/// Sanity range a parsed price must fall within to be accepted. Guards
/// against mis-extracted non-price numbers (ratings, review counts, phone
/// numbers). Exclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibilityBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl Default for PlausibilityBounds {
    fn default() -> Self {
        Self {
            min: Decimal::ONE,
            max: Decimal::from_str("10000.0").unwrap(),
        }
    }
}

impl PlausibilityBounds {
    pub fn accepts(&self, price: Decimal) -> bool {
        price > self.min && price < self.max
    }
}

pub struct PriceExtractor {
    bounds: PlausibilityBounds,
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new(PlausibilityBounds::default())
    }
}

impl PriceExtractor {
    pub fn new(bounds: PlausibilityBounds) -> Self {
        Self { bounds }
    }

    /// Returns the first plausible price found in the document, or `None`.
    pub fn extract(&self, html: &str) -> Option<Decimal> {
        let document = Html::parse_document(html);

        for selector in STRUCTURAL_RULES.iter() {
            let Some(element) = document.select(selector).next() else {
                continue;
            };
            let text: String = element.text().collect();
            if let Some(price) = parse_price(&text).filter(|p| self.bounds.accepts(*p)) {
                return Some(price);
            }
        }

        self.scan_full_text(&document)
    }

    fn scan_full_text(&self, document: &Html) -> Option<Decimal> {
        let text: String = document.root_element().text().collect::<Vec<_>>().join(" ");

        for captures in CURRENCY_ADJACENT.captures_iter(&text) {
            let amount = captures.get(1).or_else(|| captures.get(2))?;
            if let Some(price) = parse_price(amount.as_str()).filter(|p| self.bounds.accepts(*p)) {
                return Some(price);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn extract(html: &str) -> Option<Decimal> {
        PriceExtractor::default().extract(html)
    }

    #[test]
    fn structural_match_wins_over_full_text_fallback() {
        let html = r#"
            <html><body>
                <p>Vergleichspreis woanders: 222,22 €</p>
                <span class="a-price"><span class="a-offscreen">499,99 €</span></span>
            </body></html>"#;

        assert_eq!(extract(html), Some(dec("499.99")));
    }

    #[test]
    fn selector_order_prefers_the_more_specific_container() {
        // Both containers present; the nested offscreen rule runs first.
        let html = r#"
            <html><body>
                <span class="a-price"><span class="a-offscreen">89,99 €</span></span>
                <span id="priceblock_ourprice">99,99 €</span>
            </body></html>"#;

        assert_eq!(extract(html), Some(dec("89.99")));
    }

    #[test]
    fn integer_only_price_whole_snippet_is_handled() {
        let html = r#"<html><body><span class="a-price-whole">549</span></body></html>"#;

        assert_eq!(extract(html), Some(dec("549")));
    }

    #[test]
    fn implausible_structural_match_falls_through_to_later_rules() {
        // The first container parses to 0.50, below the bound; the deal
        // price container must still be consulted.
        let html = r#"
            <html><body>
                <span class="a-price"><span class="a-offscreen">0,50 €</span></span>
                <span id="priceblock_dealprice">39,90 €</span>
            </body></html>"#;

        assert_eq!(extract(html), Some(dec("39.90")));
    }

    #[test]
    fn rating_matched_by_a_tuned_bound_is_rejected() {
        let html = r#"<html><body><span class="a-price-whole">5</span></body></html>"#;
        let extractor = PriceExtractor::new(PlausibilityBounds {
            min: dec("10.0"),
            max: dec("10000.0"),
        });

        assert_eq!(extractor.extract(html), None);
    }

    #[test]
    fn values_outside_the_default_bounds_are_rejected() {
        let too_small = r#"<html><body><span class="a-offscreen">0,99 €</span></body></html>"#;
        let too_large = r#"<html><body><span class="a-offscreen">19999,00 €</span></body></html>"#;

        assert_eq!(extract(too_small), None);
        assert_eq!(extract(too_large), None);
    }

    #[test]
    fn full_text_scan_finds_currency_adjacent_amounts() {
        let trailing_symbol = r#"<html><body><p>Jetzt für nur 89,99 € kaufen!</p></body></html>"#;
        let leading_code = r#"<html><body><p>Preis: EUR 59,90 inkl. MwSt.</p></body></html>"#;

        assert_eq!(extract(trailing_symbol), Some(dec("89.99")));
        assert_eq!(extract(leading_code), Some(dec("59.90")));
    }

    #[test]
    fn page_without_any_plausible_price_yields_none() {
        let html = r#"<html><body><h1>Leider ausverkauft</h1><p>4,8 Sterne</p></body></html>"#;

        assert_eq!(extract(html), None);
    }
}
