use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for the transaction-to-order pass. Amounts are decimal strings
/// in the TOML file (`amount_tolerance = "0.99"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Maximum absolute difference between credit and order amounts.
    pub amount_tolerance: Decimal,
    /// How many days the transaction may precede the order date.
    pub days_before: i64,
    /// How many days the transaction may follow the order date.
    pub days_after: i64,
    /// A name-only candidate is accepted when its score strictly exceeds this.
    pub name_threshold: u32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        MatchingConfig {
            amount_tolerance: Decimal::new(99, 2), // 0.99
            days_before: 2,
            days_after: 3,
            name_threshold: 70,
        }
    }
}

/// Tunables for the commission-linking pass.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommissionConfig {
    /// Inclusive credit-amount band identifying commission candidates.
    pub band_min: Decimal,
    pub band_max: Decimal,
    /// Main-payment candidates must exceed this amount strictly.
    pub main_floor: Decimal,
    /// Maximum absolute day gap between commission and main.
    pub max_day_gap: i64,
    /// Minimum fuzzy name score for a main to be eligible at all.
    pub name_floor: u32,
    /// Minimum best score for the link to be created.
    pub link_threshold: u32,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        CommissionConfig {
            band_min: Decimal::new(350, 2), // 3.50
            band_max: Decimal::new(450, 2), // 4.50
            main_floor: Decimal::from(10),
            max_day_gap: 5,
            name_floor: 80,
            link_threshold: 70,
        }
    }
}

/// Extra header synonyms appended to the built-in per-field lists.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnOverrides {
    pub date: Vec<String>,
    pub payer: Vec<String>,
    pub credit: Vec<String>,
    pub description: Vec<String>,
    pub balance: Vec<String>,
    pub debit: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub matching: MatchingConfig,
    pub commission: CommissionConfig,
    pub columns: ColumnOverrides,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Config::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matching.amount_tolerance < Decimal::ZERO {
            return Err(ConfigError::Invalid(
                "matching.amount_tolerance must be non-negative".into(),
            ));
        }
        if self.matching.days_before < 0 || self.matching.days_after < 0 {
            return Err(ConfigError::Invalid(
                "matching window days must be non-negative".into(),
            ));
        }
        if self.matching.name_threshold > 100 {
            return Err(ConfigError::Invalid(
                "matching.name_threshold must be at most 100".into(),
            ));
        }
        if self.commission.band_min > self.commission.band_max {
            return Err(ConfigError::Invalid(
                "commission.band_min must not exceed commission.band_max".into(),
            ));
        }
        if self.commission.max_day_gap < 0 {
            return Err(ConfigError::Invalid(
                "commission.max_day_gap must be non-negative".into(),
            ));
        }
        if self.commission.name_floor > 100 || self.commission.link_threshold > 100 {
            return Err(ConfigError::Invalid(
                "commission score thresholds must be at most 100".into(),
            ));
        }
        Ok(())
    }
}
