//! Catalog Fixtures
//!
//! A catalog can be seeded from a YAML file:
//!
//! ```yaml
//! products:
//!   - name: Espresso Single
//!     price: 3.50 USD
//!     category: Coffee
//!     image: assets/espresso_cup_on_saucer.png
//! ```
//!
//! Items get ids from the session's id generator in file order.

use std::{fs, path::Path};

use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::{CUSTOM_CATEGORY, Catalog, CatalogError, PLACEHOLDER_IMAGE, parse_price as parse_amount},
    config::parse_currency,
    ids::IdGenerator,
    pricing::Amount,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product priced in a different currency from the register
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product rejected by the catalog
    #[error("Invalid product {name:?}: {source}")]
    Product {
        /// Product name as written in the fixture
        name: String,

        /// Why the catalog rejected it
        #[source]
        source: CatalogError,
    },
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product price (e.g., "3.50 USD")
    pub price: String,

    /// Product category
    #[serde(default)]
    pub category: Option<String>,

    /// Product image reference
    #[serde(default)]
    pub image: Option<String>,
}

/// Load a catalog from a YAML fixture file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a product is invalid.
pub fn load_catalog(
    path: impl AsRef<Path>,
    currency: &'static Currency,
    ids: &mut impl IdGenerator,
) -> Result<Catalog, FixtureError> {
    let contents = fs::read_to_string(path)?;

    catalog_from_yaml(&contents, currency, ids)
}

/// Build a catalog from YAML fixture contents.
///
/// # Errors
///
/// Returns an error if the YAML cannot be parsed or if a product is invalid.
pub fn catalog_from_yaml(
    contents: &str,
    currency: &'static Currency,
    ids: &mut impl IdGenerator,
) -> Result<Catalog, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(contents)?;

    build_catalog(fixture, currency, ids)
}

/// Build a catalog from parsed fixtures.
///
/// # Errors
///
/// Returns an error if a price is malformed, in another currency, or rejected by the catalog.
pub fn build_catalog(
    fixture: CatalogFixture,
    currency: &'static Currency,
    ids: &mut impl IdGenerator,
) -> Result<Catalog, FixtureError> {
    let mut catalog = Catalog::new(currency);

    for product in fixture.products {
        let price = parse_price(&product.price)?;

        if price.currency() != currency {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                price.currency().iso_alpha_code.to_string(),
            ));
        }

        let category = product.category.as_deref().unwrap_or(CUSTOM_CATEGORY);
        let image = product.image.as_deref().unwrap_or(PLACEHOLDER_IMAGE);

        catalog
            .register_item(&product.name, price, category, image, ids)
            .map_err(|source| FixtureError::Product {
                name: product.name.clone(),
                source,
            })?;
    }

    Ok(catalog)
}

/// Parse price string (e.g., "3.50 USD") into an amount.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<Amount, FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency =
        parse_currency(code).map_err(|_err| FixtureError::UnknownCurrency(code.to_string()))?;

    parse_amount(amount, currency).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))
}
