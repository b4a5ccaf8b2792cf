//! Error types for the qat-core library.
//!
//! Parsing itself never fails; these errors only come from loading, saving,
//! or validating a parser configuration.

use thiserror::Error;

/// Main error type for the qat library.
#[derive(Error, Debug)]
pub enum QatError {
    /// Configuration content is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Configuration file could not be decoded or encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by [`ParserConfig::validate`](crate::models::config::ParserConfig::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A product entry has an empty canonical name.
    #[error("product #{0} has an empty name")]
    EmptyProductName(usize),

    /// The same alias is claimed by two products.
    #[error("alias '{alias}' is used by both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    /// A pending-payment keyword is blank.
    #[error("pending keyword #{0} is empty")]
    EmptyKeyword(usize),

    /// The price floor is negative.
    #[error("price floor must not be negative, got {0}")]
    NegativePriceFloor(String),
}

/// Result type for the qat library.
pub type Result<T> = std::result::Result<T, QatError>;
