//! Register configuration
//!
//! The tax rate is the only pricing parameter. The currency and an optional catalog
//! fixture complete the session setup. Configuration can be built in code or read
//! from a YAML file:
//!
//! ```yaml
//! tax_rate: 8%
//! currency: USD
//! catalog: fixtures/catalog/cafe.yml
//! ```
//!
//! A tax rate without a `%` is a fraction, so `0.08` is 8%. A bare number above
//! one, such as `8`, is rejected; write `8%` instead.

use std::{
    fs,
    path::{Path, PathBuf},
};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Tax rate was not a non-negative percentage or fraction
    #[error("Invalid tax rate: {0}")]
    InvalidTaxRate(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// A tax rate as written in a config file, either `"8%"`, `"0.08"` or `0.08`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RateValue {
    Text(String),
    Number(f64),
}

/// On-disk shape of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    tax_rate: Option<RateValue>,
    currency: Option<String>,
    catalog: Option<PathBuf>,
}

/// Register configuration
#[derive(Debug, Clone)]
pub struct RegisterConfig {
    tax_rate: Percentage,
    currency: &'static Currency,
    catalog: Option<PathBuf>,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            currency: USD,
            catalog: None,
        }
    }
}

impl RegisterConfig {
    /// Default configuration: 8% tax, US dollars, built-in cafe menu.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from YAML. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the YAML is malformed or a value is invalid.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_norway::from_str(contents)?;
        let mut config = Self::default();

        if let Some(rate) = file.tax_rate {
            config.tax_rate = match rate {
                RateValue::Text(text) => parse_tax_rate(&text)?,
                RateValue::Number(number) => parse_tax_rate(&number.to_string())?,
            };
        }

        if let Some(code) = file.currency {
            config.currency = parse_currency(&code)?;
        }

        config.catalog = file.catalog;

        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// A relative `catalog` path is resolved against the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        if let (Some(catalog), Some(base)) = (config.catalog.as_ref(), path.parent())
            && catalog.is_relative()
        {
            config.catalog = Some(base.join(catalog));
        }

        Ok(config)
    }

    /// Replace the tax rate.
    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate: Percentage) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Replace the currency.
    #[must_use]
    pub fn with_currency(mut self, currency: &'static Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Load the catalog from a fixture file instead of the built-in menu.
    #[must_use]
    pub fn with_catalog(mut self, catalog: impl Into<PathBuf>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Tax rate applied at checkout
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// Currency every price is in
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Catalog fixture path, if any
    pub fn catalog(&self) -> Option<&Path> {
        self.catalog.as_deref()
    }
}

/// 8%
fn default_tax_rate() -> Percentage {
    Percentage::from(Decimal::new(8, 2))
}

/// Parse a tax rate such as `"8%"` or `"0.08"`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTaxRate`] if the value is not a number, is negative,
/// or is a fraction above one.
pub fn parse_tax_rate(s: &str) -> Result<Percentage, ConfigError> {
    let invalid = || ConfigError::InvalidTaxRate(s.to_string());
    let trimmed = s.trim();

    let value = if let Some(points) = trimmed.strip_suffix('%') {
        let points = points.trim().parse::<Decimal>().map_err(|_err| invalid())?;

        points
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(invalid)?
    } else {
        let fraction = trimmed.parse::<Decimal>().map_err(|_err| invalid())?;

        if fraction > Decimal::ONE {
            return Err(invalid());
        }

        fraction
    };

    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid());
    }

    Ok(Percentage::from(value))
}

/// Look up a supported currency by ISO code.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownCurrency`] for codes other than GBP, USD and EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, ConfigError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        _ => Err(ConfigError::UnknownCurrency(code.to_string())),
    }
}
