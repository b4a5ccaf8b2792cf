//! Rule-based field extractors for Arabic sale and debt commands.
//!
//! Each extractor tries an ordered list of rules and the first rule that
//! resolves wins. `extract_all` exposes every candidate in that same order,
//! which keeps the priority auditable.

pub mod numerals;
pub mod number_words;
pub mod quantity;
pub mod price;
pub mod names;
pub mod payment;
pub mod patterns;

pub use numerals::{fold_arabic, normalize_digits};
pub use number_words::{words_to_number, words_to_number_detailed, NumberWord, NumberWords};
pub use quantity::{extract_quantity, QuantityExtractor};
pub use price::{extract_price, PriceExtractor};
pub use names::{extract_customer_name, extract_product_name, CustomerExtractor, ProductExtractor};
pub use payment::{extract_payment_status, PaymentStatusExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract every candidate, highest priority first.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A resolved candidate together with the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that matched.
    pub rule: &'static str,
    /// Position in the searched text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
