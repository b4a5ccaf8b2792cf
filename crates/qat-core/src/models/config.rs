//! Configuration structures for the command parser.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::command::rules::numerals::fold_arabic;
use crate::command::rules::payment::DEFAULT_PENDING_KEYWORDS;
use crate::command::rules::price::DEFAULT_PRICE_FLOOR;
use crate::command::rules::quantity::DEFAULT_MAX_QUANTITY_WORD;
use crate::error::{ConfigError, Result};

/// Main configuration for the command parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Known product vocabulary.
    pub products: Vec<ProductConfig>,

    /// Payment-status configuration.
    pub payment: PaymentConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            products: default_products(),
            payment: PaymentConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

/// A product with the spellings customers use for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Canonical name, reported in parsed commands.
    pub name: String,

    /// Alternative spellings; matched after Arabic folding.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ProductConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }
}

/// Payment-status configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Words that mark a sale as deferred.
    pub pending_keywords: Vec<String>,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            pending_keywords: DEFAULT_PENDING_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Unmarked numbers must exceed this to count as a price.
    pub price_floor: Decimal,

    /// Treat "على <name>" as naming the customer.
    pub debtor_names: bool,

    /// Largest count accepted in word form ("خمسين حبه").
    pub max_quantity_word: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            price_floor: Decimal::from(DEFAULT_PRICE_FLOOR),
            debtor_names: true,
            max_quantity_word: DEFAULT_MAX_QUANTITY_WORD,
        }
    }
}

/// Built-in product vocabulary.
pub fn default_products() -> Vec<ProductConfig> {
    vec![
        ProductConfig::new("طوفان"),
        ProductConfig::new("رقم واحد").with_aliases(["رقم 1"]),
        ProductConfig::new("رقم اثنين").with_aliases(["رقم 2", "رقم اتنين"]),
        ProductConfig::new("حسين"),
        ProductConfig::new("همداني"),
        ProductConfig::new("أرحبي"),
        ProductConfig::new("عنسي"),
    ]
}

impl ParserConfig {
    /// Load configuration from a JSON file and validate it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the configuration for entries the parser cannot use.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let mut owners: HashMap<String, &str> = HashMap::new();

        for (index, product) in self.products.iter().enumerate() {
            if product.name.trim().is_empty() {
                return Err(ConfigError::EmptyProductName(index));
            }

            let mut own = std::iter::once(&product.name)
                .chain(&product.aliases)
                .map(|a| fold_arabic(a.trim()))
                .filter(|a| !a.is_empty())
                .collect::<Vec<_>>();
            own.sort();
            own.dedup();

            for alias in own {
                if let Some(first) = owners.get(&alias) {
                    return Err(ConfigError::DuplicateAlias {
                        alias,
                        first: first.to_string(),
                        second: product.name.clone(),
                    });
                }
                owners.insert(alias, product.name.as_str());
            }
        }

        if let Some(index) = self
            .payment
            .pending_keywords
            .iter()
            .position(|k| k.trim().is_empty())
        {
            return Err(ConfigError::EmptyKeyword(index));
        }

        if self.extraction.price_floor < Decimal::ZERO {
            return Err(ConfigError::NegativePriceFloor(
                self.extraction.price_floor.to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = ParserConfig::default();
        assert_eq!(config.products.len(), 7);
        assert_eq!(config.extraction.price_floor, Decimal::from(100));
        assert_eq!(config.extraction.max_quantity_word, 50);
        assert!(config.extraction.debtor_names);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ParserConfig::default();
        config.products.push(ProductConfig::new("شامي").with_aliases(["شامى"]));
        config.extraction.price_floor = Decimal::from(500);
        config.save(&path).unwrap();

        let loaded = ParserConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"extraction": {"debtor_names": false}}"#).unwrap();

        let loaded = ParserConfig::from_file(&path).unwrap();
        assert!(!loaded.extraction.debtor_names);
        assert_eq!(loaded.extraction.max_quantity_word, 50);
        assert_eq!(loaded.products, default_products());
    }

    #[test]
    fn test_duplicate_alias_after_folding() {
        let config = ParserConfig {
            products: vec![
                ProductConfig::new("أرحبي"),
                ProductConfig::new("ارحبي جديد").with_aliases(["ارحبي"]),
            ],
            ..ParserConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateAlias {
                alias: "ارحبي".to_string(),
                first: "أرحبي".to_string(),
                second: "ارحبي جديد".to_string(),
            })
        );
    }

    #[test]
    fn test_alias_repeating_own_name_is_allowed() {
        let config = ParserConfig {
            products: vec![ProductConfig::new("طوفان").with_aliases(["طوفان"])],
            ..ParserConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_entries() {
        let mut config = ParserConfig::default();
        config.products.push(ProductConfig::new("  "));
        assert_eq!(config.validate(), Err(ConfigError::EmptyProductName(7)));

        let mut config = ParserConfig::default();
        config.payment.pending_keywords.push(String::new());
        assert_eq!(config.validate(), Err(ConfigError::EmptyKeyword(8)));

        let mut config = ParserConfig::default();
        config.extraction.price_floor = Decimal::from(-1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativePriceFloor("-1".to_string()))
        );
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"products": [{"name": ""}]}"#).unwrap();
        assert!(ParserConfig::from_file(&path).is_err());

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ParserConfig::from_file(&path),
            Err(crate::error::QatError::Json(_))
        ));
    }
}
