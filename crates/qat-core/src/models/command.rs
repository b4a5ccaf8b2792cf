//! Structured sale/debt command produced by the parser.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A parsed point-of-sale command.
///
/// Built once per parse call and never mutated afterwards. Identical input
/// text (under the same parser configuration) always yields an identical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCommand {
    /// What the calling layer should do with the command.
    pub action: Action,

    /// Canonical product name, or raw text from a positional rule.
    pub product_name: Option<String>,

    /// Number of units (fractions allowed), 1 when unspecified.
    pub quantity: Decimal,

    /// Price, 0 when unrecoverable.
    pub price: Decimal,

    /// Customer name, never a reserved unit or status word.
    pub customer_name: Option<String>,

    /// Whether the sale was paid on the spot.
    pub payment_status: PaymentStatus,

    /// Input text, verbatim.
    pub raw_text: String,
}

/// Action inferred from the command's top-level keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Record a sale.
    CreateSale,
    /// Record a standalone debt.
    CreateDebt,
    /// Ask for information (totals, reports).
    Query,
}

impl Default for Action {
    fn default() -> Self {
        Self::CreateSale
    }
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateSale => "createSale",
            Action::CreateDebt => "createDebt",
            Action::Query => "query",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Paid on the spot.
    Paid,
    /// Deferred; the customer owes the amount.
    Pending,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Paid
    }
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ParsedCommand {
    /// Check the command against the rules the sale/debt screens enforce.
    ///
    /// Returns human-readable issues; an empty list means the command can be
    /// recorded as is.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        match self.action {
            Action::CreateSale => {
                if self.product_name.is_none() {
                    issues.push("Missing product name".to_string());
                }
                if self.quantity.is_zero() {
                    issues.push("Quantity must be greater than zero".to_string());
                }
                if self.price.is_zero() {
                    issues.push("Missing price".to_string());
                }
                if self.payment_status == PaymentStatus::Pending && self.customer_name.is_none() {
                    issues.push("Deferred sale without a customer".to_string());
                }
            }
            Action::CreateDebt => {
                if self.customer_name.is_none() {
                    issues.push("Debt without a customer".to_string());
                }
                if self.price.is_zero() {
                    issues.push("Missing debt amount".to_string());
                }
            }
            Action::Query => {}
        }

        issues
    }

    /// True when the customer still owes the amount.
    pub fn is_pending(&self) -> bool {
        self.payment_status == PaymentStatus::Pending
    }
}
