//! Tillpoint
//!
//! Tillpoint is the core of a point-of-sale register: a catalog of items for sale, a
//! cart that merges repeat items, and checkout into an append-only sales ledger.
//!
//! ```no_run
//! use tillpoint::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut register = Register::new(RegisterConfig::new())?;
//!
//! register.add_to_cart(ItemId::new(1))?;
//! register.add_to_cart(ItemId::new(1))?;
//!
//! if let Some(sale) = register.checkout(PaymentMethod::Card)? {
//!     println!("{} {}", sale.id(), sale.total());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod export;
pub mod fixtures;
pub mod ids;
pub mod ledger;
pub mod observability;
pub mod observer;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod register;
pub mod utils;
