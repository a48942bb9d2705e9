//! Catalog
//!
//! The set of items the register can sell. Items are kept in insertion order and
//! indexed by id; there is no removal or price editing.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    ids::{IdGenerator, ItemId},
    pricing::Amount,
};

/// Category given to items added at the register.
pub const CUSTOM_CATEGORY: &str = "Custom";

/// Image reference given to items added at the register.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1554520735-0a6b8b6ce8b7?auto=format&fit=crop&w=500&q=60";

/// Extra item ids drawn, beyond the catalog size, before giving up on an unused one.
pub const MAX_ITEM_ID_ATTEMPTS: usize = 64;

/// Malformed or missing input when registering a catalog item.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidInputError {
    /// The name was empty or only whitespace.
    #[error("item name must not be empty")]
    EmptyName,

    /// The price was not a non-negative decimal amount.
    #[error("invalid price: {0:?}")]
    InvalidPrice(String),
}

/// Errors that can occur when adding to the catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The name or price failed validation.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    /// Every drawn item id was already in the catalog.
    #[error("no unused item id after {0} attempts")]
    ItemIdExhausted(usize),

    /// The item is priced in a different currency (item currency, catalog currency).
    #[error("item is priced in {0}, but the catalog uses {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// A sellable item.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    id: ItemId,
    name: String,
    price: Amount,
    image: String,
    category: String,
}

impl CatalogItem {
    /// Identifier, unique within the catalog
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price
    pub fn price(&self) -> &Amount {
        &self.price
    }

    /// Image reference (URL or asset path)
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Free-form category label
    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Catalog
#[derive(Debug)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    index: FxHashMap<ItemId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog priced in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            index: FxHashMap::default(),
            currency,
        }
    }

    /// The default cafe menu: an espresso, a croissant and a matcha latte.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ItemIdExhausted`] if `ids` keeps handing out used ids.
    pub fn cafe_menu(
        currency: &'static Currency,
        ids: &mut impl IdGenerator,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        let menu = [
            ("Espresso Single", 350, "Coffee", "assets/espresso_cup_on_saucer.png"),
            ("Butter Croissant", 425, "Pastry", "assets/fresh_croissant.png"),
            ("Iced Matcha Latte", 575, "Tea", "assets/iced_matcha_latte.png"),
        ];

        for (name, minor, category, image) in menu {
            catalog.register_item(name, Money::from_minor(minor, currency), category, image, ids)?;
        }

        Ok(catalog)
    }

    /// Add an item entered at the register.
    ///
    /// The item gets a fresh id, the [`CUSTOM_CATEGORY`] category and the
    /// [`PLACEHOLDER_IMAGE`]. Nothing changes if validation fails.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidInput`]: the name is blank or the price does not parse
    ///   to a non-negative amount.
    /// - [`CatalogError::ItemIdExhausted`]: `ids` kept handing out ids already in use.
    pub fn add_item(
        &mut self,
        name: &str,
        price: &str,
        ids: &mut impl IdGenerator,
    ) -> Result<&CatalogItem, CatalogError> {
        let name = validate_name(name)?;
        let price = parse_price(price, self.currency)?;

        self.register_item(name, price, CUSTOM_CATEGORY, PLACEHOLDER_IMAGE, ids)
    }

    /// Add an item with an already-parsed price and explicit category and image.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidInput`]: the name is blank or the price is negative.
    /// - [`CatalogError::CurrencyMismatch`]: the price is not in the catalog currency.
    /// - [`CatalogError::ItemIdExhausted`]: `ids` kept handing out ids already in use.
    pub fn register_item(
        &mut self,
        name: &str,
        price: Amount,
        category: &str,
        image: &str,
        ids: &mut impl IdGenerator,
    ) -> Result<&CatalogItem, CatalogError> {
        let name = validate_name(name)?;

        if price.currency() != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if price.to_minor_units() < 0 {
            return Err(InvalidInputError::InvalidPrice(price.to_string()).into());
        }

        let id = self.fresh_item_id(ids)?;

        self.index.insert(id, self.items.len());
        self.items.push(CatalogItem {
            id,
            name: name.to_string(),
            price,
            image: image.to_string(),
            category: category.to_string(),
        });

        let Some(item) = self.items.last() else {
            unreachable!("an item was pushed above")
        };

        Ok(item)
    }

    /// Draw ids until one is unused. A generator of distinct ids always succeeds,
    /// since at most `len()` of its ids can collide.
    fn fresh_item_id(&self, ids: &mut impl IdGenerator) -> Result<ItemId, CatalogError> {
        let attempts = self.items.len().saturating_add(MAX_ITEM_ID_ATTEMPTS);

        for _ in 0..attempts {
            let id = ids.next_item_id();

            if !self.index.contains_key(&id) {
                return Ok(id);
            }
        }

        Err(CatalogError::ItemIdExhausted(attempts))
    }

    /// Look up an item by id.
    pub fn get(&self, id: ItemId) -> Option<&CatalogItem> {
        self.index.get(&id).and_then(|&idx| self.items.get(idx))
    }

    /// Iterate over the items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency every item is priced in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

/// Trim `name` and reject it if nothing is left.
fn validate_name(name: &str) -> Result<&str, InvalidInputError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        Err(InvalidInputError::EmptyName)
    } else {
        Ok(trimmed)
    }
}

/// Parse a user-entered price such as `"4.25"` into minor units of `currency`.
///
/// Extra fractional digits are rounded half away from zero to the currency's minor unit.
///
/// # Errors
///
/// Returns [`InvalidInputError::InvalidPrice`] if the input is empty, contains anything
/// other than digits, a sign and a decimal point, is negative, or is too large to represent.
pub fn parse_price(input: &str, currency: &'static Currency) -> Result<Amount, InvalidInputError> {
    let invalid = || InvalidInputError::InvalidPrice(input.to_string());
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '+' | '-'))
    {
        return Err(invalid());
    }

    let amount = trimmed.parse::<Decimal>().map_err(|_err| invalid())?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(invalid());
    }

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .map(Decimal::from)
        .ok_or_else(invalid)?;

    let minor = amount
        .checked_mul(scale)
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64())
        .ok_or_else(invalid)?;

    Ok(Money::from_minor(minor, currency))
}
