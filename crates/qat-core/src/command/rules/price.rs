//! Price extraction for qat sale and debt commands.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::number_words::leading_number_words;
use super::numerals::fold_arabic;
use super::patterns::{
    DECIMAL_RUN, LEADING_AMOUNT, PRICE_CURRENCY, PRICE_MARKER, PRICE_SUFFIXED, THOUSAND_WORD,
};
use super::{ExtractionMatch, FieldExtractor};

/// Bare numbers at or below this value are taken for quantities, not prices.
pub const DEFAULT_PRICE_FLOOR: u64 = 100;

/// Price field extractor.
pub struct PriceExtractor {
    floor: Decimal,
}

impl PriceExtractor {
    pub fn new() -> Self {
        Self {
            floor: Decimal::from(DEFAULT_PRICE_FLOOR),
        }
    }

    /// Set the floor used by the unmarked "largest number" rule.
    pub fn with_floor(mut self, floor: Decimal) -> Self {
        self.floor = floor;
        self
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PriceExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let folded = fold_arabic(text);
        let mut results = Vec::new();

        // "بسعر 15000", "ب عشره الاف"; a thousand-word anywhere scales small prices
        let thousands = THOUSAND_WORD.is_match(&folded);
        for m in PRICE_MARKER.find_iter(&folded) {
            if let Some(mut price) = leading_amount(&folded[m.end()..]) {
                if thousands && price < Decimal::from(1000) {
                    price *= Decimal::from(1000);
                }
                results.push(
                    ExtractionMatch::new(price, "marker", m.as_str().trim())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        // "5000 ريال", "5000 ر.ي"
        for caps in PRICE_CURRENCY.captures_iter(&folded) {
            let (Some(full), Some(amount)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if let Some(price) = parse_amount(amount.as_str()) {
                results.push(
                    ExtractionMatch::new(price, "currency", full.as_str())
                        .with_position(full.start(), full.end()),
                );
            }
        }

        // "سعرها 7000"
        for m in PRICE_SUFFIXED.find_iter(&folded) {
            if let Some(price) = leading_amount(&folded[m.end()..]) {
                results.push(
                    ExtractionMatch::new(price, "suffixed", m.as_str().trim())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        // Unmarked: the largest number above the floor
        let largest = DECIMAL_RUN
            .find_iter(&folded)
            .filter_map(|m| Decimal::from_str(m.as_str()).ok().map(|value| (value, m)))
            .filter(|(value, _)| *value > self.floor)
            .max_by(|a, b| a.0.cmp(&b.0));
        if let Some((price, m)) = largest {
            results.push(
                ExtractionMatch::new(price, "largest", m.as_str())
                    .with_position(m.start(), m.end()),
            );
        }

        results
    }
}

/// Amount at the start of `rest`: a digit run, else a run of number words.
fn leading_amount(rest: &str) -> Option<Decimal> {
    let rest = rest.trim_start();
    if let Some(m) = LEADING_AMOUNT.find(rest) {
        return parse_amount(m.as_str());
    }
    leading_number_words(rest).map(Decimal::from)
}

/// Parse digits with optional thousands commas ("15,000").
fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.replace(',', "")).ok()
}

/// Extract the price of a command, defaulting to zero.
pub fn extract_price(text: &str) -> Decimal {
    PriceExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or(Decimal::ZERO)
}
