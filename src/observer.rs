//! Register observers
//!
//! Hooks for the presentation layer to react to register events (confirmation
//! messages, sound, a customer display). Notifications are best-effort: a failing
//! observer is logged and otherwise ignored.

use thiserror::Error;
use tracing::info;

use crate::{catalog::CatalogItem, ledger::SaleRecord, pricing::to_decimal};

/// An observer could not deliver a notification.
#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(String);

impl NotifyError {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Observer for register events.
#[cfg_attr(test, mockall::automock)]
pub trait RegisterObserver {
    /// A new item was added to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] if the notification could not be delivered.
    fn item_added(&mut self, item: &CatalogItem) -> Result<(), NotifyError>;

    /// A checkout completed and `sale` was recorded.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] if the notification could not be delivered.
    fn sale_completed(&mut self, sale: &SaleRecord) -> Result<(), NotifyError>;
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RegisterObserver for NoopObserver {
    fn item_added(&mut self, _item: &CatalogItem) -> Result<(), NotifyError> {
        Ok(())
    }

    fn sale_completed(&mut self, _sale: &SaleRecord) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Observer that reports events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RegisterObserver for TracingObserver {
    fn item_added(&mut self, item: &CatalogItem) -> Result<(), NotifyError> {
        info!(item_id = %item.id(), "product added: {} is now available", item.name());

        Ok(())
    }

    fn sale_completed(&mut self, sale: &SaleRecord) -> Result<(), NotifyError> {
        info!(
            sale_id = %sale.id(),
            total = %to_decimal(&sale.total()),
            "order completed: transaction #{} successful",
            sale.id()
        );

        Ok(())
    }
}
