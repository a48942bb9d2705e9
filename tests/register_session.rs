//! Integration tests for a full register session: ringing up, checkout and history.
//!
//! The default cafe menu is Espresso Single ($3.50, id 1), Butter Croissant
//! ($4.25, id 2) and Iced Matcha Latte ($5.75, id 3), taxed at 8%.

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{GBP, USD},
};
use testresult::TestResult;

use tillpoint::{
    catalog::CatalogError,
    clock::FixedClock,
    config::{RegisterConfig, parse_tax_rate},
    ids::{ItemId, SequentialIds},
    ledger::PaymentMethod,
    observer::NoopObserver,
    register::{Register, RegisterError},
};

const ESPRESSO: ItemId = ItemId::new(1);
const CROISSANT: ItemId = ItemId::new(2);
const MATCHA: ItemId = ItemId::new(3);

type TestRegister = Register<SequentialIds, FixedClock, NoopObserver>;

fn open(config: RegisterConfig) -> Result<TestRegister, RegisterError> {
    Register::with_parts(
        config,
        SequentialIds::new(),
        FixedClock::new(Timestamp::UNIX_EPOCH),
        NoopObserver,
    )
}

#[test]
fn cafe_order_totals_and_summary() -> TestResult {
    let mut register = open(RegisterConfig::new())?;

    register.add_to_cart(ESPRESSO)?;
    register.add_to_cart(ESPRESSO)?;
    register.add_to_cart(CROISSANT)?;

    let totals = register.totals()?;

    assert_eq!(totals.subtotal, Money::from_minor(1125, USD));
    assert_eq!(totals.tax, Money::from_minor(90, USD));
    assert_eq!(totals.total, Money::from_minor(1215, USD));
    assert_eq!(
        register.cart().line_summary(),
        "2x Espresso Single, 1x Butter Croissant"
    );

    let sale = register
        .checkout(PaymentMethod::Card)?
        .cloned()
        .ok_or("expected a sale")?;

    assert_eq!(sale.total(), Money::from_minor(1215, USD));
    assert_eq!(sale.line_summary(), "2x Espresso Single, 1x Butter Croissant");
    assert!(register.cart().is_empty());

    Ok(())
}

#[test]
fn history_is_most_recent_first_after_many_checkouts() -> TestResult {
    let mut register = open(RegisterConfig::new())?;
    let items = [ESPRESSO, CROISSANT, MATCHA, ESPRESSO, MATCHA];

    for (n, item) in items.into_iter().enumerate() {
        register.add_to_cart(item)?;
        register.clock_mut().advance(SignedDuration::from_secs(60));

        let sale = register.checkout(PaymentMethod::Card)?.ok_or("expected a sale")?;

        assert_eq!(sale.id().as_str(), format!("S{:08}", n + 1));
    }

    let history: Vec<_> = register.history().collect();

    assert_eq!(history.len(), items.len());
    assert_eq!(history.first().map(|sale| sale.id().as_str()), Some("S00000005"));
    assert_eq!(history.last().map(|sale| sale.id().as_str()), Some("S00000001"));
    assert!(
        history
            .windows(2)
            .all(|pair| matches!(pair, [newer, older] if newer.timestamp() > older.timestamp()))
    );

    Ok(())
}

#[test]
fn empty_checkout_changes_nothing() -> TestResult {
    let mut register = open(RegisterConfig::new())?;

    register.add_to_cart(MATCHA)?;
    register.checkout(PaymentMethod::Card)?;

    let before: Vec<_> = register.history().cloned().collect();

    assert!(register.checkout(PaymentMethod::Card)?.is_none());

    let after: Vec<_> = register.history().cloned().collect();

    assert_eq!(before, after);
    assert!(register.cart().is_empty());

    Ok(())
}

#[test]
fn quantities_never_drop_below_one() -> TestResult {
    let mut register = open(RegisterConfig::new())?;

    register.add_to_cart(CROISSANT)?;

    for delta in [-1, -5, i64::MIN, 0] {
        assert_eq!(register.update_quantity(CROISSANT, delta), Some(1));
    }

    assert_eq!(register.update_quantity(CROISSANT, 2), Some(3));
    assert_eq!(register.cart().item_count(), 3);

    Ok(())
}

#[test]
fn removed_lines_are_not_charged() -> TestResult {
    let mut register = open(RegisterConfig::new())?;

    register.add_to_cart(ESPRESSO)?;
    register.add_to_cart(MATCHA)?;
    register.remove_from_cart(ESPRESSO);

    let sale = register.checkout(PaymentMethod::Card)?.ok_or("expected a sale")?;

    assert_eq!(sale.line_summary(), "1x Iced Matcha Latte");
    assert_eq!(sale.total(), Money::from_minor(621, USD));

    Ok(())
}

#[test]
fn invalid_catalog_input_leaves_catalog_unchanged() -> TestResult {
    let mut register = open(RegisterConfig::new())?;

    for (name, price) in [("", "5.00"), ("   ", "5.00"), ("Muffin", "abc"), ("Muffin", "-1")] {
        let result = register.add_catalog_item(name, price);

        assert!(
            matches!(result, Err(RegisterError::Catalog(CatalogError::InvalidInput(_)))),
            "expected ({name:?}, {price:?}) to be rejected"
        );
    }

    assert_eq!(register.catalog().len(), 3);

    Ok(())
}

#[test]
fn new_catalog_items_can_be_sold() -> TestResult {
    let mut register = open(RegisterConfig::new())?;

    let muffin = register.add_catalog_item("Blueberry Muffin", "2.755")?;

    assert_eq!(muffin.category(), "Custom");
    assert_eq!(muffin.price(), &Money::from_minor(276, USD));

    let muffin = muffin.id();

    register.add_to_cart(muffin)?;

    let sale = register.checkout(PaymentMethod::Card)?.ok_or("expected a sale")?;

    assert_eq!(sale.line_summary(), "1x Blueberry Muffin");

    Ok(())
}

#[test]
fn configured_tax_rate_and_currency_apply() -> TestResult {
    let config = RegisterConfig::new()
        .with_tax_rate(parse_tax_rate("20%")?)
        .with_currency(GBP);

    let mut register = open(config)?;

    register.add_to_cart(CROISSANT)?;

    let totals = register.totals()?;

    assert_eq!(totals.subtotal, Money::from_minor(425, GBP));
    assert_eq!(totals.tax, Money::from_minor(85, GBP));
    assert_eq!(totals.total, Money::from_minor(510, GBP));

    Ok(())
}

#[test]
fn export_rows_carry_post_tax_totals() -> TestResult {
    let mut register = open(RegisterConfig::new())?;

    register.add_to_cart(ESPRESSO)?;
    register.add_to_cart(ESPRESSO)?;
    register.add_to_cart(CROISSANT)?;
    register.checkout(PaymentMethod::Card)?;

    let rows = register.export_rows();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows.first().map(|row| row.total), Some(Decimal::new(1215, 2)));
    assert_eq!(rows.first().map(|row| row.payment_method), Some(PaymentMethod::Card));

    Ok(())
}
