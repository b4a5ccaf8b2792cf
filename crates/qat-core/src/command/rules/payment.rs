//! Payment-status classification.

use crate::models::command::PaymentStatus;

use super::numerals::fold_arabic;
use super::{ExtractionMatch, FieldExtractor};

/// Words marking a deferred (unpaid) sale.
pub const DEFAULT_PENDING_KEYWORDS: &[&str] =
    &["معلق", "آجل", "دين", "ذمة", "عليه", "مؤجل", "باقي", "نسيئة"];

/// Payment status extractor.
pub struct PaymentStatusExtractor {
    keywords: Vec<String>,
}

impl PaymentStatusExtractor {
    pub fn new() -> Self {
        Self::with_keywords(DEFAULT_PENDING_KEYWORDS.iter().copied())
    }

    /// Use a custom pending-keyword list. Blank keywords are ignored.
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| fold_arabic(k.as_ref().trim()))
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }
}

impl Default for PaymentStatusExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PaymentStatusExtractor {
    type Output = ExtractionMatch<PaymentStatus>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let folded = fold_arabic(text);

        self.keywords
            .iter()
            .filter_map(|keyword| {
                folded.find(keyword.as_str()).map(|start| {
                    ExtractionMatch::new(PaymentStatus::Pending, "pending_keyword", keyword.as_str())
                        .with_position(start, start + keyword.len())
                })
            })
            .collect()
    }
}

/// Classify a command as pending when any deferred-payment word appears.
pub fn extract_payment_status(text: &str) -> PaymentStatus {
    PaymentStatusExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or(PaymentStatus::Paid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_keywords() {
        assert_eq!(
            extract_payment_status("سجل بيع حسين 3 وحدة بسعر 15000 معلق"),
            PaymentStatus::Pending
        );
        assert_eq!(extract_payment_status("بيع طوفان أجل"), PaymentStatus::Pending);
        assert_eq!(extract_payment_status("بيع طوفان آجل"), PaymentStatus::Pending);
        assert_eq!(extract_payment_status("عليه دين"), PaymentStatus::Pending);
        assert_eq!(extract_payment_status("في الذمة"), PaymentStatus::Pending);
        assert_eq!(extract_payment_status("بيع نسيئة"), PaymentStatus::Pending);
    }

    #[test]
    fn test_paid_by_default() {
        assert_eq!(
            extract_payment_status("سجل بيع طوفان 5 كيلو بسعر 10000 ريال"),
            PaymentStatus::Paid
        );
        assert_eq!(extract_payment_status(""), PaymentStatus::Paid);
        assert_eq!(extract_payment_status("cash 🌿"), PaymentStatus::Paid);
    }

    #[test]
    fn test_every_hit_is_reported() {
        let all = PaymentStatusExtractor::new().extract_all("عليه دين معلق");
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|m| m.value == PaymentStatus::Pending));
    }

    #[test]
    fn test_custom_keywords() {
        let extractor = PaymentStatusExtractor::with_keywords(["بالحساب", " ", ""]);
        assert!(extractor.extract("بيع طوفان بالحساب").is_some());
        assert!(extractor.extract("بيع طوفان معلق").is_none());
        assert!(extractor.extract("بيع طوفان").is_none());
    }
}
