//! Rule-based command parser assembling every field extractor.

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use crate::models::command::{Action, ParsedCommand, PaymentStatus};
use crate::models::config::ParserConfig;

use super::rules::numerals::fold_arabic;
use super::rules::{
    CustomerExtractor, ExtractionMatch, FieldExtractor, PaymentStatusExtractor, PriceExtractor,
    ProductExtractor, QuantityExtractor,
};
use super::CommandParser;

/// First words that turn a command into a query.
const QUERY_WORDS: &[&str] = &["كم", "اعرض", "عرض", "استعلام", "تقرير", "ابحث"];

/// Which rule produced a field of the parsed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatch {
    /// Command field name.
    pub field: &'static str,
    /// Name of the rule that matched.
    pub rule: &'static str,
    /// Source text that was matched.
    pub source: String,
}

/// Result of command parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// Parsed command.
    pub command: ParsedCommand,
    /// Winning rule per field, in extraction order. Defaulted fields are absent.
    pub matches: Vec<FieldMatch>,
    /// Validation warnings.
    pub warnings: Vec<String>,
}

/// Command parser driven by ordered regex and keyword rules.
pub struct RuleCommandParser {
    quantity: QuantityExtractor,
    price: PriceExtractor,
    product: ProductExtractor,
    customer: CustomerExtractor,
    payment: PaymentStatusExtractor,
}

impl RuleCommandParser {
    /// Create a parser with the built-in vocabulary and keywords.
    pub fn new() -> Self {
        Self {
            quantity: QuantityExtractor::new(),
            price: PriceExtractor::new(),
            product: ProductExtractor::new(),
            customer: CustomerExtractor::new(),
            payment: PaymentStatusExtractor::new(),
        }
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &ParserConfig) -> Self {
        let keywords = &config.payment.pending_keywords;

        Self {
            quantity: QuantityExtractor::new().with_max_word(config.extraction.max_quantity_word),
            price: PriceExtractor::new().with_floor(config.extraction.price_floor),
            product: ProductExtractor::from_products(&config.products).with_pending_keywords(keywords),
            customer: CustomerExtractor::new()
                .with_pending_keywords(keywords)
                .with_debtor_names(config.extraction.debtor_names),
            payment: PaymentStatusExtractor::with_keywords(keywords),
        }
    }
}

impl Default for RuleCommandParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandParser for RuleCommandParser {
    fn parse(&self, text: &str) -> ParseResult {
        let mut matches = Vec::new();
        let action = infer_action(text);

        let product_name = record(&mut matches, "productName", self.product.extract(text));
        let quantity =
            record(&mut matches, "quantity", self.quantity.extract(text)).unwrap_or(Decimal::ONE);
        let price = record(&mut matches, "price", self.price.extract(text)).unwrap_or(Decimal::ZERO);
        let customer_name = record(&mut matches, "customerName", self.customer.extract(text));
        let payment_status = record(&mut matches, "paymentStatus", self.payment.extract(text))
            .unwrap_or(PaymentStatus::Paid);

        let command = ParsedCommand {
            action,
            product_name,
            quantity,
            price,
            customer_name,
            payment_status,
            raw_text: text.to_string(),
        };

        debug!(
            "Parsed {} command: product={:?} quantity={} price={} customer={:?} status={}",
            command.action,
            command.product_name,
            command.quantity,
            command.price,
            command.customer_name,
            command.payment_status
        );

        let warnings = command.validate();

        ParseResult {
            command,
            matches,
            warnings,
        }
    }
}

/// Unwrap an extraction, noting which rule produced it.
fn record<T>(
    matches: &mut Vec<FieldMatch>,
    field: &'static str,
    found: Option<ExtractionMatch<T>>,
) -> Option<T> {
    let Some(found) = found else {
        trace!("No rule matched {}", field);
        return None;
    };

    trace!("Field {} matched rule {} on {:?}", field, found.rule, found.source);
    matches.push(FieldMatch {
        field,
        rule: found.rule,
        source: found.source,
    });
    Some(found.value)
}

/// Infer the command's action from its keywords.
///
/// A mention of debt ("دين") makes a debt command unless the text is an
/// explicit sale ("سجل بيع"); a leading interrogative or report verb makes a
/// query; everything else is a sale.
pub fn infer_action(text: &str) -> Action {
    let folded = fold_arabic(text);
    let words: Vec<&str> = folded.split_whitespace().collect();
    let collapsed = words.join(" ");

    if collapsed.contains("دين") && !collapsed.contains("سجل بيع") {
        Action::CreateDebt
    } else if words.first().is_some_and(|w| QUERY_WORDS.contains(w)) {
        Action::Query
    } else {
        Action::CreateSale
    }
}

lazy_static! {
    static ref DEFAULT_PARSER: RuleCommandParser = RuleCommandParser::new();
}

/// Parse a free-form Arabic command with the built-in rules.
pub fn parse_full_command(text: &str) -> ParsedCommand {
    DEFAULT_PARSER.parse_command(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ProductConfig;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sale_command() {
        let text = "سجل بيع طوفان 5 كيلو بسعر 10000 ريال للزبون أحمد";
        assert_eq!(
            parse_full_command(text),
            ParsedCommand {
                action: Action::CreateSale,
                product_name: Some("طوفان".to_string()),
                quantity: dec("5"),
                price: dec("10000"),
                customer_name: Some("أحمد".to_string()),
                payment_status: PaymentStatus::Paid,
                raw_text: text.to_string(),
            }
        );
    }

    #[test]
    fn test_debt_command() {
        let command = parse_full_command("سجل دين على محمد بمبلغ 50000 ريال");
        assert_eq!(command.action, Action::CreateDebt);
        assert_eq!(command.customer_name, Some("محمد".to_string()));
        assert_eq!(command.price, dec("50000"));
        assert_eq!(command.payment_status, PaymentStatus::Pending);
        assert_eq!(command.product_name, None);
    }

    #[test]
    fn test_deferred_sale_stays_a_sale() {
        let command = parse_full_command("سجل بيع حسين 3 وحدة بسعر 15000 عليه دين");
        assert_eq!(command.action, Action::CreateSale);
        assert_eq!(command.product_name, Some("حسين".to_string()));
        assert_eq!(command.quantity, dec("3"));
        assert_eq!(command.price, dec("15000"));
        assert_eq!(command.payment_status, PaymentStatus::Pending);

        // Extra spaces between the verbs still read as an explicit sale
        assert_eq!(infer_action("سجل   بيع طوفان دين"), Action::CreateSale);
    }

    #[test]
    fn test_word_form_command() {
        let command = parse_full_command("بيع نص حبة همداني بخمسة عشر ألف");
        assert_eq!(command.action, Action::CreateSale);
        assert_eq!(command.product_name, Some("همداني".to_string()));
        assert_eq!(command.quantity, dec("0.5"));
        assert_eq!(command.price, dec("15000"));
    }

    #[test]
    fn test_query_action() {
        assert_eq!(infer_action("كم المبيعات اليوم"), Action::Query);
        assert_eq!(infer_action("اعرض تقرير الديون"), Action::Query);
        assert_eq!(infer_action("عرض المبيعات"), Action::Query);
        assert_eq!(infer_action("بيع طوفان"), Action::CreateSale);
        assert_eq!(infer_action(""), Action::CreateSale);
    }

    #[test]
    fn test_matches_and_warnings() {
        let result = RuleCommandParser::new().parse("سجل بيع طوفان 5 كيلو بسعر 10000 ريال للزبون أحمد");
        let fields: Vec<(&str, &str)> = result.matches.iter().map(|m| (m.field, m.rule)).collect();
        assert_eq!(
            fields,
            vec![
                ("productName", "vocabulary"),
                ("quantity", "first_digits"),
                ("price", "marker"),
                ("customerName", "customer_noun"),
            ]
        );
        assert!(result.warnings.is_empty());

        let result = RuleCommandParser::new().parse("بيع");
        assert_eq!(
            result.warnings,
            vec!["Missing product name".to_string(), "Missing price".to_string()]
        );
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_defaults_for_empty_input() {
        let command = parse_full_command("");
        assert_eq!(command.action, Action::CreateSale);
        assert_eq!(command.product_name, None);
        assert_eq!(command.quantity, Decimal::ONE);
        assert_eq!(command.price, Decimal::ZERO);
        assert_eq!(command.customer_name, None);
        assert_eq!(command.payment_status, PaymentStatus::Paid);
        assert_eq!(command.raw_text, "");
    }

    #[test]
    fn test_adversarial_input_never_panics() {
        let inputs = [
            "🌿🌿🌿",
            "بيع 🌿 حبة",
            "ـــــ",
            "؟!.,،؛",
            "sell طوفان x٣ for ١٢٬٠٠٠",
            "ل",
            "على",
            "بسعر",
            "سعرها",
            "كمية",
            "99999999999999999999999999999999999999 ريال",
            "بسعر 99999999999999999999999999999999999999",
            "\u{200f}\u{200e}\u{0000}",
            "ب ب ب ب ب",
            "حبتين حبتين حبتين",
        ];

        for input in inputs {
            let command = parse_full_command(input);
            assert!(command.quantity >= Decimal::ZERO, "input {:?}", input);
            assert!(command.price >= Decimal::ZERO, "input {:?}", input);
            assert_eq!(command.raw_text, input);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "سجل بيع رقم 1 حبتين بعشرين الف لعلي معلق";
        let parser = RuleCommandParser::new();
        let first = parser.parse(text);
        for _ in 0..10 {
            assert_eq!(parser.parse(text), first);
        }
    }

    #[test]
    fn test_shared_across_threads() {
        let parser = Arc::new(RuleCommandParser::new());
        let text = "سجل بيع طوفان 5 كيلو بسعر 10000 ريال للزبون أحمد";
        let expected = parser.parse_command(text);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let parser = Arc::clone(&parser);
                std::thread::spawn(move || parser.parse_command(text))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_from_config() {
        let mut config = ParserConfig::default();
        config.products = vec![ProductConfig::new("شامي").with_aliases(["شامى"])];
        config.payment.pending_keywords = vec!["بالحساب".to_string()];
        config.extraction.debtor_names = false;
        config.extraction.price_floor = dec("5000");

        let parser = RuleCommandParser::from_config(&config);

        let command = parser.parse_command("بيع شامى 2 حبة 4000 بالحساب");
        assert_eq!(command.product_name, Some("شامي".to_string()));
        assert_eq!(command.quantity, dec("2"));
        assert_eq!(command.price, Decimal::ZERO);
        assert_eq!(command.payment_status, PaymentStatus::Pending);

        let command = parser.parse_command("سجل دين على محمد بمبلغ 50000 ريال");
        assert_eq!(command.customer_name, None);
        assert_eq!(command.payment_status, PaymentStatus::Paid);
    }
}
