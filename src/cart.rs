//! Cart
//!
//! The order being assembled at the register. Lines are merged by item id, so a
//! cart never holds two lines for the same item, and every line has a quantity of
//! at least one.

use std::num::NonZeroU32;

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    catalog::CatalogItem,
    ids::ItemId,
    pricing::{Amount, OrderTotals, PricingError, line_total, total_price},
};

/// Separator between entries of a line summary.
pub const SUMMARY_SEPARATOR: &str = ", ";

/// One catalog item and how many of it are in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    item: CatalogItem,
    quantity: NonZeroU32,
}

impl CartLine {
    fn new(item: CatalogItem) -> Self {
        Self {
            item,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Snapshot of the catalog item taken when the line was created
    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    /// Quantity, always at least one
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
    pub fn total(&self) -> Result<Amount, PricingError> {
        line_total(self.item.price(), self.quantity())
    }

    /// `"<quantity>x <name>"`
    pub fn summary(&self) -> String {
        format!("{}x {}", self.quantity, self.item.name())
    }

    fn adjust(&mut self, delta: i64) {
        let adjusted = i64::from(self.quantity.get())
            .saturating_add(delta)
            .clamp(1, i64::from(u32::MAX));

        self.quantity = u32::try_from(adjusted)
            .ok()
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MIN);
    }
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart {
    lines: SmallVec<[CartLine; 8]>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            lines: SmallVec::new(),
            currency,
        }
    }

    /// Add one of `item`, returning the line's new quantity.
    ///
    /// An existing line for the same id is incremented; otherwise a new line with
    /// quantity one is appended.
    pub fn add_item(&mut self, item: &CatalogItem) -> u32 {
        if let Some(line) = self.line_mut(item.id()) {
            line.quantity = line.quantity.saturating_add(1);

            return line.quantity();
        }

        self.lines.push(CartLine::new(item.clone()));

        1
    }

    /// Remove the line for `item_id`, returning it if there was one.
    pub fn remove_item(&mut self, item_id: ItemId) -> Option<CartLine> {
        let idx = self
            .lines
            .iter()
            .position(|line| line.item.id() == item_id)?;

        Some(self.lines.remove(idx))
    }

    /// Change the quantity of the line for `item_id` by `delta`, never going below one.
    ///
    /// Returns the new quantity, or `None` if there is no such line.
    pub fn update_quantity(&mut self, item_id: ItemId, delta: i64) -> Option<u32> {
        let line = self.line_mut(item_id)?;
        line.adjust(delta);

        Some(line.quantity())
    }

    /// Sum of line totals; zero for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line total overflows or a line is in another currency.
    pub fn subtotal(&self) -> Result<Amount, PricingError> {
        if self.is_empty() {
            return Ok(Money::from_minor(0, self.currency));
        }

        let line_totals = self
            .lines
            .iter()
            .map(CartLine::total)
            .collect::<Result<SmallVec<[Amount; 8]>, _>>()?;

        total_price(self.currency, line_totals)
    }

    /// Tax on the subtotal at `rate`, rounded to the minor unit.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal or tax cannot be computed.
    pub fn tax_total(&self, rate: Percentage) -> Result<Amount, PricingError> {
        Ok(self.totals(rate)?.tax)
    }

    /// Subtotal plus tax at `rate`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal or tax cannot be computed.
    pub fn grand_total(&self, rate: Percentage) -> Result<Amount, PricingError> {
        Ok(self.totals(rate)?.total)
    }

    /// Subtotal, tax and grand total at `rate`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal or tax cannot be computed.
    pub fn totals(&self, rate: Percentage) -> Result<OrderTotals, PricingError> {
        OrderTotals::at_rate(self.subtotal()?, rate)
    }

    /// Human-readable description of the cart, e.g. `"2x Espresso Single, 1x Butter Croissant"`.
    pub fn line_summary(&self) -> String {
        self.lines
            .iter()
            .map(CartLine::summary)
            .collect::<SmallVec<[String; 8]>>()
            .join(SUMMARY_SEPARATOR)
    }

    /// Lines in first-added order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Line for `item_id`, if present.
    pub fn line(&self, item_id: ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item.id() == item_id)
    }

    /// Number of lines (distinct items).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Check if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, item_id: ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item.id() == item_id)
    }
}
