//! Quantity extraction for qat sale commands.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::number_words::{lookup_number_word, Accumulator, NumberWord};
use super::numerals::fold_arabic;
use super::patterns::{DECIMAL_RUN, QUANTITY_COUNTED, QUANTITY_DUAL, QUANTITY_KEYWORD};
use super::{ExtractionMatch, FieldExtractor};

/// Fractional qat quantities, as (folded word, mantissa, scale).
const FRACTIONS: &[(&str, i64, u32)] = &[
    ("نص", 5, 1),
    ("نصف", 5, 1),
    ("ربع", 25, 2),
    ("ثلث", 33, 2),
    ("ثلثين", 67, 2),
    ("ثلثان", 67, 2),
];

/// Default upper bound for spelled-out counts ("خمسين حبه").
pub const DEFAULT_MAX_QUANTITY_WORD: u64 = 50;

/// Value of a fraction word such as "نص" or "ربع".
pub fn fraction_value(token: &str) -> Option<Decimal> {
    FRACTIONS
        .iter()
        .find(|(word, _, _)| *word == token)
        .map(|(_, mantissa, scale)| Decimal::new(*mantissa, *scale))
}

/// Quantity field extractor.
pub struct QuantityExtractor {
    max_word: u64,
}

impl QuantityExtractor {
    pub fn new() -> Self {
        Self {
            max_word: DEFAULT_MAX_QUANTITY_WORD,
        }
    }

    /// Set the largest count accepted in word form.
    pub fn with_max_word(mut self, max_word: u64) -> Self {
        self.max_word = max_word;
        self
    }

    /// Resolve a folded token: digits, then fractions, then spelled cardinals.
    fn resolve_token(&self, token: &str) -> Option<Decimal> {
        self.resolve_run(token, "").map(|(quantity, _)| quantity)
    }

    /// Resolve a token that directly follows `before`. Spelled cardinals take
    /// in the number words at the end of `before` ("خمسه عشر", "خمسه و عشرين").
    /// Returns the quantity and the byte length of `before` that was used.
    fn resolve_run(&self, token: &str, before: &str) -> Option<(Decimal, usize)> {
        if let Some(m) = DECIMAL_RUN.find(token) {
            if m.start() == 0 {
                return Decimal::from_str(m.as_str()).ok().map(|q| (q, 0));
            }
        }
        if let Some(fraction) = fraction_value(token) {
            return Some((fraction, 0));
        }

        let last @ NumberWord::Value(_) = lookup_number_word(token)? else {
            return None;
        };
        let mut words = vec![last];
        let mut used = 0;
        let mut rest = before.trim_end();

        loop {
            let (head, word) = rest
                .rsplit_once(char::is_whitespace)
                .unwrap_or(("", rest));
            if word.is_empty() {
                break;
            }
            if word != "و" {
                match lookup_number_word(word) {
                    Some(value @ NumberWord::Value(_)) => {
                        words.push(value);
                        used = before.len() - (rest.len() - word.len());
                    }
                    _ => break,
                }
            }
            rest = head.trim_end();
        }

        let mut acc = Accumulator::default();
        for word in words.into_iter().rev() {
            acc.push(word);
        }

        let count = acc.value();
        (1..=self.max_word)
            .contains(&count)
            .then_some((Decimal::from(count), used))
    }
}

impl Default for QuantityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for QuantityExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let folded = fold_arabic(text);
        let mut results = Vec::new();

        // "3 حبات", "نص حبه", "خمسه عشر حبه"
        for caps in QUANTITY_COUNTED.captures_iter(&folded) {
            let (Some(full), Some(token)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let before = &folded[..token.start()];
            if let Some((quantity, used)) = self.resolve_run(token.as_str(), before) {
                let start = token.start() - used;
                results.push(
                    ExtractionMatch::new(quantity, "counted", &folded[start..full.end()])
                        .with_position(start, full.end()),
                );
            }
        }

        // The dual noun carries its own count
        if let Some(m) = QUANTITY_DUAL.find(&folded) {
            results.push(
                ExtractionMatch::new(Decimal::from(2), "dual", m.as_str().trim())
                    .with_position(m.start(), m.end()),
            );
        }

        // "كميه 4"
        for caps in QUANTITY_KEYWORD.captures_iter(&folded) {
            let (Some(full), Some(token)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if let Some(quantity) = self.resolve_token(token.as_str()) {
                results.push(
                    ExtractionMatch::new(quantity, "keyword", full.as_str().trim())
                        .with_position(full.start(), full.end()),
                );
            }
        }

        if let Some(m) = DECIMAL_RUN.find(&folded) {
            if let Ok(quantity) = Decimal::from_str(m.as_str()) {
                results.push(
                    ExtractionMatch::new(quantity, "first_digits", m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results
    }
}

/// Extract the quantity of a command, defaulting to one unit.
pub fn extract_quantity(text: &str) -> Decimal {
    QuantityExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or(Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_counted_digits() {
        assert_eq!(extract_quantity("بيع طوفان 3 حبات بسعر 15000"), dec("3"));
        assert_eq!(extract_quantity("سجل بيع حسين 3 وحدة بسعر 15000 معلق"), dec("3"));
        assert_eq!(extract_quantity("بيع ١٢ حبة"), dec("12"));
        assert_eq!(extract_quantity("2.5 حبة رقم واحد"), dec("2.5"));
    }

    #[test]
    fn test_fractions() {
        assert_eq!(extract_quantity("نص حبة طوفان"), dec("0.5"));
        assert_eq!(extract_quantity("نصف حبه"), dec("0.5"));
        assert_eq!(extract_quantity("ربع حبة"), dec("0.25"));
        assert_eq!(extract_quantity("ثلث حبة"), dec("0.33"));
        assert_eq!(extract_quantity("ثلثين حبة همداني"), dec("0.67"));
    }

    #[test]
    fn test_spelled_counts() {
        assert_eq!(extract_quantity("ثلاث حبات طوفان"), dec("3"));
        assert_eq!(extract_quantity("عشرين وحدة"), dec("20"));
        assert_eq!(extract_quantity("خمسة حبات"), dec("5"));
    }

    #[test]
    fn test_two_word_counts() {
        assert_eq!(extract_quantity("خمسة عشر حبة"), dec("15"));
        assert_eq!(extract_quantity("خمسة وعشرين حبة"), dec("25"));
        assert_eq!(extract_quantity("بيع خمسة و عشرين حبة"), dec("25"));
        assert_eq!(extract_quantity("اثنا عشر حبة طوفان"), dec("12"));

        let m = QuantityExtractor::new().extract("بيع طوفان خمسة عشر حبة").unwrap();
        assert_eq!(m.rule, "counted");
        assert_eq!(m.source, "خمسه عشر حبه");

        // The limit applies to the whole count
        assert!(QuantityExtractor::new().extract("ثلاثين و خمسين حبة").is_none());
    }

    #[test]
    fn test_spelled_count_above_limit_is_ignored() {
        let extractor = QuantityExtractor::new();
        assert!(extractor.extract("ستين حبه").is_none());
        assert_eq!(extract_quantity("ستين حبه"), Decimal::ONE);

        let wide = QuantityExtractor::new().with_max_word(100);
        assert_eq!(wide.extract("ستين حبه").unwrap().value, dec("60"));
    }

    #[test]
    fn test_dual() {
        let m = QuantityExtractor::new().extract("حبتين طوفان").unwrap();
        assert_eq!(m.value, dec("2"));
        assert_eq!(m.rule, "dual");
    }

    #[test]
    fn test_quantity_keyword() {
        let m = QuantityExtractor::new().extract("كمية 4 طوفان").unwrap();
        assert_eq!(m.value, dec("4"));
        assert_eq!(m.rule, "keyword");

        assert_eq!(extract_quantity("الكمية: خمسة"), dec("5"));
    }

    #[test]
    fn test_first_digits_fallback() {
        let m = QuantityExtractor::new()
            .extract("سجل بيع طوفان 5 كيلو بسعر 10000 ريال")
            .unwrap();
        assert_eq!(m.value, dec("5"));
        assert_eq!(m.rule, "first_digits");
    }

    #[test]
    fn test_priority_order() {
        let all = QuantityExtractor::new().extract_all("بيع 3 حبات بسعر 15000");
        let rules: Vec<&str> = all.iter().map(|m| m.rule).collect();
        assert_eq!(rules, vec!["counted", "first_digits"]);
    }

    #[test]
    fn test_default_is_one() {
        assert_eq!(extract_quantity(""), Decimal::ONE);
        assert_eq!(extract_quantity("طوفان للزبون أحمد"), Decimal::ONE);
        assert_eq!(extract_quantity("!!! ؟؟"), Decimal::ONE);
    }

    #[test]
    fn test_never_negative() {
        for input in ["-5 حبات", "كمية -3", "−7", "بيع -2"] {
            assert!(extract_quantity(input) >= Decimal::ZERO, "input {:?}", input);
        }
    }
}
