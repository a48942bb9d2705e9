//! Register
//!
//! The session object. A [`Register`] owns the catalog, the cart being rung up and
//! the ledger of completed sales, and is the only way to move an order from one to
//! the other.

use decimal_percentage::Percentage;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    cart::{Cart, CartLine},
    catalog::{Catalog, CatalogError, CatalogItem},
    clock::{Clock, SystemClock},
    config::RegisterConfig,
    export::{SaleRow, export},
    fixtures::{FixtureError, load_catalog},
    ids::{IdGenerator, ItemId, RandomIds, SaleId},
    ledger::{Ledger, PaymentMethod, SaleRecord},
    observer::{NoopObserver, RegisterObserver},
    pricing::{OrderTotals, PricingError, to_decimal},
};

/// How many sale ids are drawn before checkout gives up on finding an unused one.
pub const MAX_SALE_ID_ATTEMPTS: usize = 64;

/// Errors from catalog and cart operations on a register.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The item id is not in the catalog.
    #[error("unknown catalog item: {0}")]
    UnknownItem(ItemId),

    /// The catalog rejected an item.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The catalog fixture could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// Errors from checkout. The cart and ledger are unchanged when one is returned.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The order total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Every drawn sale id was already in the ledger.
    #[error("no unused sale id after {0} attempts")]
    SaleIdExhausted(usize),
}

/// A point-of-sale session.
#[derive(Debug)]
pub struct Register<I = RandomIds, C = SystemClock, O = NoopObserver> {
    config: RegisterConfig,
    catalog: Catalog,
    cart: Cart,
    ledger: Ledger,
    ids: I,
    clock: C,
    observer: O,
}

impl Register {
    /// Open a register with random sale ids and the system clock.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError`] if the configured catalog fixture cannot be loaded.
    pub fn new(config: RegisterConfig) -> Result<Self, RegisterError> {
        Self::with_parts(config, RandomIds::new(), SystemClock, NoopObserver)
    }
}

impl<I: IdGenerator, C: Clock, O: RegisterObserver> Register<I, C, O> {
    /// Open a register with explicit collaborators.
    ///
    /// The catalog is loaded from the configured fixture, or is the built-in cafe
    /// menu when none is set.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError`] if the catalog cannot be built.
    pub fn with_parts(
        config: RegisterConfig,
        mut ids: I,
        clock: C,
        observer: O,
    ) -> Result<Self, RegisterError> {
        let catalog = match config.catalog() {
            Some(path) => load_catalog(path, config.currency(), &mut ids)?,
            None => Catalog::cafe_menu(config.currency(), &mut ids)?,
        };

        info!(
            items = catalog.len(),
            currency = catalog.currency().iso_alpha_code,
            "register opened"
        );

        Ok(Self::with_catalog(config, catalog, ids, clock, observer))
    }

    /// Open a register over an existing catalog. The cart uses the catalog's currency.
    pub fn with_catalog(
        config: RegisterConfig,
        catalog: Catalog,
        ids: I,
        clock: C,
        observer: O,
    ) -> Self {
        let cart = Cart::new(catalog.currency());

        Self {
            config,
            catalog,
            cart,
            ledger: Ledger::new(),
            ids,
            clock,
            observer,
        }
    }

    /// Add an item to the catalog from operator input such as `("Muffin", "2.75")`.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::Catalog`] if the name is blank or the price is invalid.
    /// The catalog is unchanged in that case.
    pub fn add_catalog_item(
        &mut self,
        name: &str,
        price: &str,
    ) -> Result<&CatalogItem, RegisterError> {
        let item = self.catalog.add_item(name, price, &mut self.ids)?;

        info!(item_id = %item.id(), name = item.name(), "catalog item added");

        if let Err(source) = self.observer.item_added(item) {
            warn!(item_id = %item.id(), "item added notification failed: {source}");
        }

        Ok(item)
    }

    /// Add one unit of a catalog item to the cart, returning the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::UnknownItem`] if `item_id` is not in the catalog.
    pub fn add_to_cart(&mut self, item_id: ItemId) -> Result<u32, RegisterError> {
        let item = self
            .catalog
            .get(item_id)
            .ok_or(RegisterError::UnknownItem(item_id))?;

        let quantity = self.cart.add_item(item);

        debug!(%item_id, quantity, "added to cart");

        Ok(quantity)
    }

    /// Remove a line from the cart. Does nothing if the item is not in the cart.
    pub fn remove_from_cart(&mut self, item_id: ItemId) -> Option<CartLine> {
        let removed = self.cart.remove_item(item_id);

        if removed.is_some() {
            debug!(%item_id, "removed from cart");
        }

        removed
    }

    /// Adjust a line's quantity by `delta`, never going below one.
    ///
    /// Returns the new quantity, or `None` if the item is not in the cart.
    pub fn update_quantity(&mut self, item_id: ItemId, delta: i64) -> Option<u32> {
        let quantity = self.cart.update_quantity(item_id, delta);

        if let Some(quantity) = quantity {
            debug!(%item_id, delta, quantity, "cart quantity updated");
        }

        quantity
    }

    /// Subtotal, tax and grand total of the cart at the configured tax rate.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the totals cannot be represented.
    pub fn totals(&self) -> Result<OrderTotals, PricingError> {
        self.cart.totals(self.config.tax_rate())
    }

    /// Charge the cart and record the sale.
    ///
    /// An empty cart is a no-op and returns `Ok(None)`. Otherwise the sale is
    /// prepended to the ledger, the cart is emptied and the new record is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the total cannot be computed or no unused sale
    /// id can be drawn. Neither the cart nor the ledger changes in that case.
    #[instrument(skip(self))]
    pub fn checkout(
        &mut self,
        payment_method: PaymentMethod,
    ) -> Result<Option<&SaleRecord>, CheckoutError> {
        if self.cart.is_empty() {
            debug!("checkout with an empty cart ignored");

            return Ok(None);
        }

        let totals = self.totals()?;
        let sale_id = self.fresh_sale_id()?;

        let record = SaleRecord::new(
            sale_id,
            self.clock.now(),
            totals.total,
            self.cart.line_summary(),
            payment_method,
        );

        self.ledger.append(record);
        self.cart.clear();

        let Some(sale) = self.ledger.latest() else {
            unreachable!("a sale was appended above")
        };

        info!(
            sale_id = %sale.id(),
            total = %to_decimal(&sale.total()),
            items = sale.line_summary(),
            "sale completed"
        );

        if let Err(source) = self.observer.sale_completed(sale) {
            warn!(sale_id = %sale.id(), "sale completed notification failed: {source}");
        }

        Ok(Some(sale))
    }

    /// Completed sales, most recent first.
    pub fn history(
        &self,
    ) -> impl DoubleEndedIterator<Item = &SaleRecord> + ExactSizeIterator + Clone {
        self.ledger.history()
    }

    /// Flat rows for every completed sale, most recent first.
    pub fn export_rows(&self) -> Vec<SaleRow> {
        export(self.ledger.history())
    }

    /// Session configuration
    pub fn config(&self) -> &RegisterConfig {
        &self.config
    }

    /// Tax rate applied at checkout
    pub fn tax_rate(&self) -> Percentage {
        self.config.tax_rate()
    }

    /// Items available for sale
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Order being rung up
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Completed sales
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Event observer
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the clock, e.g. to advance a [`FixedClock`](crate::clock::FixedClock).
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    fn fresh_sale_id(&mut self) -> Result<SaleId, CheckoutError> {
        for _ in 0..MAX_SALE_ID_ATTEMPTS {
            let sale_id = self.ids.next_sale_id();

            if !self.ledger.contains(&sale_id) {
                return Ok(sale_id);
            }

            debug!(%sale_id, "sale id already used, drawing another");
        }

        Err(CheckoutError::SaleIdExhausted(MAX_SALE_ID_ATTEMPTS))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use jiff::{SignedDuration, Timestamp};
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        clock::FixedClock,
        ids::SequentialIds,
        observer::{MockRegisterObserver, NotifyError},
    };

    use super::*;

    const ESPRESSO: ItemId = ItemId::new(1);
    const CROISSANT: ItemId = ItemId::new(2);
    const MATCHA: ItemId = ItemId::new(3);

    fn opened_at() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap_or(Timestamp::UNIX_EPOCH)
    }

    fn register<O: RegisterObserver>(
        observer: O,
    ) -> Result<Register<SequentialIds, FixedClock, O>, RegisterError> {
        Register::with_parts(
            RegisterConfig::new(),
            SequentialIds::new(),
            FixedClock::new(opened_at()),
            observer,
        )
    }

    /// Hands out sale ids from a script, repeating the last one forever.
    #[derive(Debug)]
    struct ScriptedIds {
        items: SequentialIds,
        sales: VecDeque<&'static str>,
        last: &'static str,
    }

    impl ScriptedIds {
        fn new(sales: &[&'static str]) -> Self {
            Self {
                items: SequentialIds::new(),
                sales: sales.iter().copied().collect(),
                last: sales.last().copied().unwrap_or("SAME"),
            }
        }
    }

    impl IdGenerator for ScriptedIds {
        fn next_item_id(&mut self) -> ItemId {
            self.items.next_item_id()
        }

        fn next_sale_id(&mut self) -> SaleId {
            SaleId::new(self.sales.pop_front().unwrap_or(self.last))
        }
    }

    #[test]
    fn opens_with_the_cafe_menu() -> TestResult {
        let register = register(NoopObserver)?;

        assert_eq!(register.catalog().len(), 3);
        assert_eq!(
            register.catalog().get(CROISSANT).map(CatalogItem::name),
            Some("Butter Croissant")
        );
        assert!(register.cart().is_empty());
        assert!(register.ledger().is_empty());

        Ok(())
    }

    #[test]
    fn add_to_cart_merges_lines() -> TestResult {
        let mut register = register(NoopObserver)?;

        assert_eq!(register.add_to_cart(ESPRESSO)?, 1);
        assert_eq!(register.add_to_cart(ESPRESSO)?, 2);

        assert_eq!(register.cart().len(), 1);
        assert_eq!(register.cart().line(ESPRESSO).map(CartLine::quantity), Some(2));

        Ok(())
    }

    #[test]
    fn add_to_cart_rejects_unknown_items() -> TestResult {
        let mut register = register(NoopObserver)?;

        let result = register.add_to_cart(ItemId::new(99));

        assert!(matches!(result, Err(RegisterError::UnknownItem(id)) if id == ItemId::new(99)));
        assert!(register.cart().is_empty());

        Ok(())
    }

    #[test]
    fn remove_and_update_are_noops_for_missing_lines() -> TestResult {
        let mut register = register(NoopObserver)?;
        register.add_to_cart(ESPRESSO)?;

        assert!(register.remove_from_cart(MATCHA).is_none());
        assert_eq!(register.update_quantity(MATCHA, 5), None);
        assert_eq!(register.cart().len(), 1);

        assert_eq!(register.update_quantity(ESPRESSO, -10), Some(1));
        assert!(register.remove_from_cart(ESPRESSO).is_some());
        assert!(register.cart().is_empty());

        Ok(())
    }

    #[test]
    fn checkout_records_the_sale_and_empties_the_cart() -> TestResult {
        let mut register = register(NoopObserver)?;

        register.add_to_cart(ESPRESSO)?;
        register.add_to_cart(ESPRESSO)?;
        register.add_to_cart(CROISSANT)?;

        let expected_total = register.totals()?.total;

        let sale = register
            .checkout(PaymentMethod::Card)?
            .cloned()
            .ok_or("checkout produced no sale")?;

        assert_eq!(sale.id().as_str(), "S00000001");
        assert_eq!(sale.total(), expected_total);
        assert_eq!(sale.total(), Money::from_minor(1215, USD));
        assert_eq!(sale.line_summary(), "2x Espresso Single, 1x Butter Croissant");
        assert_eq!(sale.timestamp(), opened_at());
        assert_eq!(sale.payment_method(), PaymentMethod::Card);

        assert!(register.cart().is_empty());
        assert_eq!(register.history().next(), Some(&sale));

        Ok(())
    }

    #[test]
    fn checkout_with_an_empty_cart_is_a_noop() -> TestResult {
        let mut register = register(NoopObserver)?;

        assert!(register.checkout(PaymentMethod::Card)?.is_none());
        assert!(register.ledger().is_empty());
        assert!(register.cart().is_empty());

        Ok(())
    }

    #[test]
    fn checkout_stamps_each_sale_with_the_clock() -> TestResult {
        let mut register = register(NoopObserver)?;

        register.add_to_cart(MATCHA)?;
        register.checkout(PaymentMethod::Card)?;

        register.clock_mut().advance(SignedDuration::from_mins(5));

        register.add_to_cart(MATCHA)?;
        register.checkout(PaymentMethod::Card)?;

        let stamps: Vec<Timestamp> = register.history().map(SaleRecord::timestamp).collect();

        assert_eq!(
            stamps,
            [
                opened_at().checked_add(SignedDuration::from_mins(5))?,
                opened_at()
            ]
        );

        Ok(())
    }

    #[test]
    fn checkout_redraws_colliding_sale_ids() -> TestResult {
        let mut register = Register::with_parts(
            RegisterConfig::new(),
            ScriptedIds::new(&["AAAAAAAAA", "AAAAAAAAA", "BBBBBBBBB"]),
            FixedClock::new(opened_at()),
            NoopObserver,
        )?;

        register.add_to_cart(ESPRESSO)?;
        register.checkout(PaymentMethod::Card)?;

        register.add_to_cart(ESPRESSO)?;
        register.checkout(PaymentMethod::Card)?;

        let ids: Vec<&str> = register.history().map(|sale| sale.id().as_str()).collect();

        assert_eq!(ids, ["BBBBBBBBB", "AAAAAAAAA"]);

        Ok(())
    }

    #[test]
    fn checkout_failure_leaves_cart_and_ledger_untouched() -> TestResult {
        let mut register = Register::with_parts(
            RegisterConfig::new(),
            ScriptedIds::new(&["SAME"]),
            FixedClock::new(opened_at()),
            NoopObserver,
        )?;

        register.add_to_cart(ESPRESSO)?;
        register.checkout(PaymentMethod::Card)?;

        register.add_to_cart(CROISSANT)?;
        let result = register.checkout(PaymentMethod::Card);

        assert!(matches!(
            result,
            Err(CheckoutError::SaleIdExhausted(MAX_SALE_ID_ATTEMPTS))
        ));
        assert_eq!(register.ledger().len(), 1);
        assert_eq!(register.cart().line(CROISSANT).map(CartLine::quantity), Some(1));

        Ok(())
    }

    #[test]
    fn observer_is_told_about_completed_sales() -> TestResult {
        let mut observer = MockRegisterObserver::new();

        observer
            .expect_sale_completed()
            .withf(|sale| sale.line_summary() == "1x Iced Matcha Latte")
            .times(1)
            .returning(|_| Ok(()));

        let mut register = register(observer)?;

        register.add_to_cart(MATCHA)?;
        register.checkout(PaymentMethod::Card)?;

        Ok(())
    }

    #[test]
    fn failing_observer_does_not_fail_checkout() -> TestResult {
        let mut observer = MockRegisterObserver::new();

        observer
            .expect_sale_completed()
            .times(1)
            .returning(|_| Err(NotifyError::new("customer display offline")));

        let mut register = register(observer)?;

        register.add_to_cart(MATCHA)?;

        assert!(register.checkout(PaymentMethod::Card)?.is_some());
        assert_eq!(register.ledger().len(), 1);

        Ok(())
    }

    #[test]
    fn observer_is_told_about_new_catalog_items() -> TestResult {
        let mut observer = MockRegisterObserver::new();

        observer
            .expect_item_added()
            .withf(|item| item.name() == "Muffin" && item.id() == ItemId::new(4))
            .times(1)
            .returning(|_| Err(NotifyError::new("toast queue full")));

        let mut register = register(observer)?;

        let muffin = register.add_catalog_item(" Muffin ", "2.75")?.id();

        assert_eq!(register.catalog().len(), 4);
        assert_eq!(register.add_to_cart(muffin)?, 1);

        Ok(())
    }

    #[test]
    fn catalog_items_can_be_added_over_an_existing_catalog() -> TestResult {
        let catalog = Catalog::cafe_menu(USD, &mut SequentialIds::new())?;

        let mut register = Register::with_catalog(
            RegisterConfig::new(),
            catalog,
            SequentialIds::new(),
            FixedClock::new(opened_at()),
            NoopObserver,
        );

        let muffin = register.add_catalog_item("Muffin", "2.75")?.id();
        let scone = register.add_catalog_item("Scone", "3.10")?.id();

        assert_eq!(muffin, ItemId::new(4));
        assert_eq!(scone, ItemId::new(5));
        assert_eq!(register.catalog().len(), 5);

        Ok(())
    }

    #[test]
    fn invalid_catalog_items_are_rejected_without_notifying() -> TestResult {
        let mut observer = MockRegisterObserver::new();
        observer.expect_item_added().never();

        let mut register = register(observer)?;

        assert!(register.add_catalog_item("", "5.00").is_err());
        assert!(register.add_catalog_item("Muffin", "abc").is_err());
        assert_eq!(register.catalog().len(), 3);

        Ok(())
    }

    #[test]
    fn export_rows_follow_history_order() -> TestResult {
        let mut register = register(NoopObserver)?;

        register.add_to_cart(ESPRESSO)?;
        register.checkout(PaymentMethod::Card)?;
        register.add_to_cart(CROISSANT)?;
        register.checkout(PaymentMethod::Card)?;

        let ids: Vec<String> = register.export_rows().into_iter().map(|row| row.id).collect();

        assert_eq!(ids, ["S00000002", "S00000001"]);

        Ok(())
    }
}
