//! Pricing
//!
//! All amounts are held in minor units (cents). Rates are applied in decimal space
//! and rounded half away from zero back to a whole minor unit.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// A monetary amount in a register currency.
pub type Amount = Money<'static, Currency>;

/// Errors that can occur while calculating prices and totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line total or rate application did not fit in minor units.
    #[error("amount overflowed while pricing")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Subtotal, tax and grand total for an order at a given tax rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    /// Sum of line totals before tax
    pub subtotal: Amount,

    /// Tax charged on the subtotal
    pub tax: Amount,

    /// Amount to charge
    pub total: Amount,
}

impl OrderTotals {
    /// Compute totals for `subtotal` at `rate`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the tax or total cannot be represented.
    pub fn at_rate(subtotal: Amount, rate: Percentage) -> Result<Self, PricingError> {
        let tax = percent_of(&subtotal, rate)?;
        let total = subtotal.add(tax)?;

        Ok(Self {
            subtotal,
            tax,
            total,
        })
    }
}

/// Price of `quantity` units at `price` each.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
pub fn line_total(price: &Amount, quantity: u32) -> Result<Amount, PricingError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Sum a sequence of amounts, starting from zero in `currency`.
///
/// # Errors
///
/// Returns a [`PricingError::Money`] if any amount is in a different currency.
pub fn total_price(
    currency: &'static Currency,
    amounts: impl IntoIterator<Item = Amount>,
) -> Result<Amount, PricingError> {
    let total = amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| acc.add(amount))?;

    Ok(total)
}

/// Apply `rate` to `amount`, rounding to the nearest minor unit.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product cannot be represented.
pub fn percent_of(amount: &Amount, rate: Percentage) -> Result<Amount, PricingError> {
    let minor = Decimal::from(amount.to_minor_units());

    let applied = (rate * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(applied, amount.currency()))
}

/// Amount as a plain decimal in major units (e.g. `12.15`).
pub fn to_decimal(amount: &Amount) -> Decimal {
    Decimal::new(amount.to_minor_units(), amount.currency().exponent)
}

/// Rate as percent points for display (e.g. `8` for 8%).
pub fn percent_points(rate: Percentage) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}
