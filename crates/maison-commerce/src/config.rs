//! Storefront configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Currency;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML could not be parsed.
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON could not be parsed.
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Storefront-wide settings for the bag and catalog listings.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Currency of an empty bag's total.
    pub currency: Currency,
    /// Largest quantity a single line may hold.
    pub max_quantity_per_item: i64,
    /// Products per page on the shop listing.
    pub listing_page_size: usize,
    /// Products shown in the home page's featured grid.
    pub featured_page_size: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            max_quantity_per_item: 9999,
            listing_page_size: 24,
            featured_page_size: 8,
        }
    }
}

impl StorefrontConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything else
    /// as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every limit is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_quantity_per_item < 1 {
            return Err(ConfigError::Invalid {
                field: "max_quantity_per_item",
                reason: format!("must be at least 1, got {}", self.max_quantity_per_item),
            });
        }
        if self.listing_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "listing_page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.featured_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "featured_page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
