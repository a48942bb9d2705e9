//! Tillpoint prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine},
    catalog::{Catalog, CatalogError, CatalogItem, InvalidInputError},
    clock::{Clock, FixedClock, SystemClock},
    config::{ConfigError, RegisterConfig},
    export::{ExportError, SaleRow, export, export_to_path, write_csv, write_table},
    fixtures::FixtureError,
    ids::{IdGenerator, ItemId, RandomIds, SaleId, SequentialIds},
    ledger::{Ledger, PaymentMethod, SaleRecord},
    observer::{NoopObserver, NotifyError, RegisterObserver, TracingObserver},
    pricing::{Amount, OrderTotals, PricingError},
    receipt::{ReceiptError, write_order},
    register::{CheckoutError, Register, RegisterError},
};
