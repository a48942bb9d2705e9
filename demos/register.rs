//! Register Example
//!
//! This example rings up an order on the default cafe menu, checks it out and
//! prints the sales history.
//!
//! Use `-c` to load a register config (see `fixtures/register.yml`)
//! Use `-i` to ring up items by id, e.g. `-i 1,1,2`
//! Use `-a` to add a catalog item first, e.g. `-a "Muffin=2.75"`
//! Use `-e` to export the sales history as CSV
//!
//! Run with: `cargo run --example register -- -i 1,1,2`

use std::io;

use anyhow::Result;
use clap::Parser;
use tillpoint::{
    clock::SystemClock,
    config::{RegisterConfig, parse_tax_rate},
    export::{export_to_path, write_table},
    ids::{ItemId, RandomIds},
    ledger::PaymentMethod,
    observability::init_subscriber,
    observer::TracingObserver,
    receipt::write_order,
    register::Register,
    utils::ExampleRegisterArgs,
};

/// Register Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExampleRegisterArgs::parse();

    init_subscriber(&args.logging)?;

    let mut config = match args.config.as_deref() {
        Some(path) => RegisterConfig::load(path)?,
        None => RegisterConfig::new(),
    };

    if let Some(rate) = args.tax_rate.as_deref() {
        config = config.with_tax_rate(parse_tax_rate(rate)?);
    }

    let mut register = Register::with_parts(config, RandomIds::new(), SystemClock, TracingObserver)?;

    for (name, price) in &args.add {
        register.add_catalog_item(name, price)?;
    }

    let items = if args.items.is_empty() {
        vec![1, 1, 2]
    } else {
        args.items.clone()
    };

    for id in items {
        register.add_to_cart(ItemId::new(id))?;
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    write_order(&mut handle, register.cart(), register.tax_rate())?;

    if let Some(sale) = register.checkout(PaymentMethod::Card)? {
        println!("Transaction #{} successful.\n", sale.id());
    }

    write_table(&mut handle, register.history())?;

    if let Some(path) = args.export.as_deref() {
        export_to_path(path, &register.export_rows())?;

        println!("\nExported {} sales to {}", register.ledger().len(), path.display());
    }

    Ok(())
}
