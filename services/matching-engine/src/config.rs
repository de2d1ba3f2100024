//! Engine configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::numeric::MAX_DECIMAL_PLACES;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("price_decimal_places {0} exceeds the maximum of {max}", max = MAX_DECIMAL_PLACES)]
    TooManyDecimalPlaces(u32),

    #[error("max_mass_quote_entries must be at least 1")]
    NoMassQuoteEntries,
}

/// Configuration for the matching engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Decimal places prices are normalised to (1234 = 12.34 at 2).
    pub price_decimal_places: u32,
    /// Largest number of quote entries one mass quote may carry.
    pub max_mass_quote_entries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            price_decimal_places: 2,
            max_mass_quote_entries: 100,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.price_decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::TooManyDecimalPlaces(self.price_decimal_places));
        }
        if self.max_mass_quote_entries == 0 {
            return Err(ConfigError::NoMassQuoteEntries);
        }
        Ok(())
    }
}
