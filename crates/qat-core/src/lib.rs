//! Core library for parsing Arabic qat sale and debt commands.
//!
//! This crate provides:
//! - Arabic-Indic digit normalization and Arabic spelling folding
//! - Spelled-out Arabic number conversion ("عشرة آلاف" → 10000)
//! - Rule-based extraction of quantity, price, product, customer and payment status
//! - Command assembly into a structured, serializable sale/debt record
//! - JSON parser configuration (product vocabulary, keywords, thresholds)

pub mod error;
pub mod models;
pub mod command;

pub use error::{ConfigError, QatError, Result};
pub use models::command::{Action, ParsedCommand, PaymentStatus};
pub use models::config::{ExtractionConfig, ParserConfig, PaymentConfig, ProductConfig};
pub use command::{
    infer_action, parse_full_command, CommandParser, FieldMatch, ParseResult, RuleCommandParser,
};
pub use command::rules::{
    extract_customer_name, extract_payment_status, extract_price, extract_product_name,
    extract_quantity, fold_arabic, normalize_digits, words_to_number, words_to_number_detailed,
    NumberWords,
};
