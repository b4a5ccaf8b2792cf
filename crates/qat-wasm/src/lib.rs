//! WASM bindings for the Arabic qat command parser.
//!
//! This crate lets the browser POS app parse sale and debt commands
//! without a round-trip to the server.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use qat_core::{CommandParser as _, ParserConfig, RuleCommandParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Parse a free-form Arabic command into a structured sale/debt record.
#[wasm_bindgen]
pub fn parse_command(text: &str) -> Result<JsValue, JsValue> {
    to_js(&qat_core::parse_full_command(text))
}

/// Parse a command, also returning the matching rules and validation warnings.
#[wasm_bindgen]
pub fn parse_command_with_details(text: &str) -> Result<JsValue, JsValue> {
    to_js(&RuleCommandParser::new().parse(text))
}

/// Replace Arabic-Indic and Persian digits with ASCII digits.
#[wasm_bindgen]
pub fn normalize_digits(text: &str) -> String {
    qat_core::normalize_digits(text)
}

/// Convert a spelled-out Arabic number ("عشرة آلاف") to a number.
#[wasm_bindgen]
pub fn words_to_number(text: &str) -> f64 {
    qat_core::words_to_number(text) as f64
}

/// Quantity of a command, 1 when none is given.
#[wasm_bindgen]
pub fn extract_quantity(text: &str) -> f64 {
    to_f64(qat_core::extract_quantity(text))
}

/// Price of a command, 0 when none is found.
#[wasm_bindgen]
pub fn extract_price(text: &str) -> f64 {
    to_f64(qat_core::extract_price(text))
}

#[wasm_bindgen]
pub fn extract_product_name(text: &str) -> Option<String> {
    qat_core::extract_product_name(text)
}

#[wasm_bindgen]
pub fn extract_customer_name(text: &str) -> Option<String> {
    qat_core::extract_customer_name(text)
}

/// "paid" or "pending".
#[wasm_bindgen]
pub fn extract_payment_status(text: &str) -> String {
    qat_core::extract_payment_status(text).as_str().to_string()
}

/// Command parser class for browser use, optionally configured from JSON.
#[wasm_bindgen]
pub struct CommandParser {
    parser: RuleCommandParser,
}

#[wasm_bindgen]
impl CommandParser {
    /// Create a parser. `config_json` uses the same format as the CLI
    /// configuration file; omitted sections keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<CommandParser, JsValue> {
        let config = match config_json {
            Some(json) => {
                let config: ParserConfig =
                    serde_json::from_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?;
                config
                    .validate()
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
                config
            }
            None => ParserConfig::default(),
        };

        Ok(Self {
            parser: RuleCommandParser::from_config(&config),
        })
    }

    /// Parse a command.
    #[wasm_bindgen]
    pub fn parse(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse_command(text))
    }

    /// Parse a command with the matching rules and validation warnings.
    #[wasm_bindgen]
    pub fn parse_with_details(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text))
    }

    /// Validation issues for a command; empty when it can be recorded.
    #[wasm_bindgen]
    pub fn validate(&self, text: &str) -> Vec<String> {
        self.parser.parse(text).warnings
    }
}
