//! Product and customer name extraction.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::config::{default_products, ProductConfig};

use super::number_words::lookup_number_word;
use super::numerals::{fold_arabic, normalize_digits};
use super::patterns::{
    CUSTOMER_DATIVE, CUSTOMER_DEBTOR, CUSTOMER_NAMED, CUSTOMER_NOUN, PRODUCT_BEFORE_UNIT,
    PRODUCT_LABELLED,
};
use super::payment::DEFAULT_PENDING_KEYWORDS;
use super::quantity::fraction_value;
use super::{ExtractionMatch, FieldExtractor};

/// Unit, status, customer-noun and filler words that can never be a name.
const RESERVED_WORDS: &[&str] = &[
    "حبة", "حبات", "حبتين", "وحدة", "وحدات", "كيلو",
    "مدفوع", "مدفوعة", "نقدا", "نقد", "كاش", "خالص",
    "زبون", "الزبون", "لزبون", "عميل", "العميل", "لعميل", "شخص", "الشخص", "لشخص",
    "حساب", "الحساب", "كل", "الكل",
];

/// Command verbs that the positional product rules must skip.
const COMMAND_WORDS: &[&str] = &[
    "سجل", "بيع", "بع", "اضف", "أضف", "دين", "بسعر", "سعر", "السعر", "بالسعر", "منتج", "صنف", "نوع",
];

lazy_static! {
    static ref FOLDED_COMMAND_WORDS: HashSet<String> =
        COMMAND_WORDS.iter().map(|w| fold_arabic(w)).collect();
}

/// Folded reserved set: built-in words plus the pending keywords in use.
fn reserved_set<I, S>(pending_keywords: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    RESERVED_WORDS
        .iter()
        .map(|w| fold_arabic(w))
        .chain(pending_keywords.into_iter().map(|k| fold_arabic(k.as_ref().trim())))
        .filter(|w| !w.is_empty())
        .collect()
}

/// True for number words and fraction words ("خمسه", "نص").
fn is_number_word(folded: &str) -> bool {
    lookup_number_word(folded).is_some() || fraction_value(folded).is_some()
}

/// A product with its folded aliases.
#[derive(Debug, Clone)]
struct Product {
    name: String,
    aliases: Vec<String>,
}

/// Product name extractor.
pub struct ProductExtractor {
    products: Vec<Product>,
    reserved: HashSet<String>,
}

impl ProductExtractor {
    /// Create an extractor over the built-in product vocabulary.
    pub fn new() -> Self {
        Self::from_products(&default_products())
    }

    /// Create an extractor over a custom vocabulary.
    pub fn from_products(products: &[ProductConfig]) -> Self {
        let products = products
            .iter()
            .filter(|p| !p.name.trim().is_empty())
            .map(|p| Product {
                name: p.name.trim().to_string(),
                aliases: std::iter::once(&p.name)
                    .chain(&p.aliases)
                    .map(|a| fold_arabic(a.trim()))
                    .filter(|a| !a.is_empty())
                    .collect(),
            })
            .collect();

        Self {
            products,
            reserved: reserved_set(DEFAULT_PENDING_KEYWORDS),
        }
    }

    /// Reserve the given pending keywords instead of the built-in ones.
    pub fn with_pending_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reserved = reserved_set(keywords);
        self
    }

    fn accepts(&self, candidate: &str) -> bool {
        let folded = fold_arabic(candidate);
        !folded.is_empty()
            && !self.reserved.contains(&folded)
            && !FOLDED_COMMAND_WORDS.contains(&folded)
            && !is_number_word(&folded)
    }
}

impl Default for ProductExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ProductExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let folded = fold_arabic(text);
        let mut results = Vec::new();

        // Known vocabulary, by plain containment
        for product in &self.products {
            let hit = product
                .aliases
                .iter()
                .find_map(|alias| folded.find(alias.as_str()).map(|start| (alias, start)));
            if let Some((alias, start)) = hit {
                results.push(
                    ExtractionMatch::new(product.name.clone(), "vocabulary", alias.as_str())
                        .with_position(start, start + alias.len()),
                );
            }
        }

        // Positional fallbacks keep the user's spelling
        let digits = normalize_digits(text);
        for (rule, pattern) in [
            ("labelled", &*PRODUCT_LABELLED),
            ("before_unit", &*PRODUCT_BEFORE_UNIT),
        ] {
            for caps in pattern.captures_iter(&digits) {
                let Some(name) = caps.get(1) else {
                    continue;
                };
                let candidate = name.as_str().trim();
                if self.accepts(candidate) {
                    results.push(
                        ExtractionMatch::new(candidate.to_string(), rule, name.as_str())
                            .with_position(name.start(), name.end()),
                    );
                }
            }
        }

        results
    }
}

/// Customer name extractor.
pub struct CustomerExtractor {
    reserved: HashSet<String>,
    debtor_names: bool,
}

impl CustomerExtractor {
    pub fn new() -> Self {
        Self {
            reserved: reserved_set(DEFAULT_PENDING_KEYWORDS),
            debtor_names: true,
        }
    }

    /// Reserve the given pending keywords instead of the built-in ones.
    pub fn with_pending_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reserved = reserved_set(keywords);
        self
    }

    /// Set whether "على <name>" (debt on someone) yields a customer.
    pub fn with_debtor_names(mut self, enabled: bool) -> Self {
        self.debtor_names = enabled;
        self
    }

    fn rules(&self) -> Vec<(&'static str, &'static Regex)> {
        let mut rules: Vec<(&'static str, &'static Regex)> = vec![
            ("customer_noun", &*CUSTOMER_NOUN),
            ("named", &*CUSTOMER_NAMED),
        ];
        if self.debtor_names {
            rules.push(("debtor", &*CUSTOMER_DEBTOR));
        }
        rules.push(("dative", &*CUSTOMER_DATIVE));
        rules
    }

    fn accepts(&self, candidate: &str) -> bool {
        let folded = fold_arabic(candidate);
        !folded.is_empty() && !self.reserved.contains(&folded) && !is_number_word(&folded)
    }
}

impl Default for CustomerExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CustomerExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let digits = normalize_digits(text);
        let mut results = Vec::new();

        for (rule, pattern) in self.rules() {
            for caps in pattern.captures_iter(&digits) {
                let Some(name) = caps.get(1) else {
                    continue;
                };
                let candidate = name.as_str().trim();
                if self.accepts(candidate) {
                    results.push(
                        ExtractionMatch::new(candidate.to_string(), rule, name.as_str())
                            .with_position(name.start(), name.end()),
                    );
                }
            }
        }

        results
    }
}

/// Extract the product name, canonical when the vocabulary matches.
pub fn extract_product_name(text: &str) -> Option<String> {
    ProductExtractor::new().extract(text).map(|m| m.value)
}

/// Extract the customer name following a naming or dative marker.
pub fn extract_customer_name(text: &str) -> Option<String> {
    CustomerExtractor::new().extract(text).map(|m| m.value)
}
