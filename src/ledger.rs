//! Ledger
//!
//! Append-only history of completed sales, most recent first. Records are only
//! ever added by a checkout; nothing edits or removes them.

use std::{collections::VecDeque, fmt, str::FromStr};

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ids::SaleId, pricing::Amount};

/// Payment method label was not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(String);

/// How a sale was paid for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Card payment
    #[default]
    Card,
}

impl PaymentMethod {
    /// Display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "Card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("card") {
            Ok(Self::Card)
        } else {
            Err(UnknownPaymentMethod(value.to_string()))
        }
    }
}

/// A finalized sale. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    id: SaleId,
    timestamp: Timestamp,
    total: Amount,
    line_summary: String,
    payment_method: PaymentMethod,
}

impl SaleRecord {
    pub(crate) fn new(
        id: SaleId,
        timestamp: Timestamp,
        total: Amount,
        line_summary: String,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            id,
            timestamp,
            total,
            line_summary,
            payment_method,
        }
    }

    /// Transaction id
    pub fn id(&self) -> &SaleId {
        &self.id
    }

    /// When the checkout completed
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Amount charged, including tax
    pub fn total(&self) -> Amount {
        self.total
    }

    /// What was bought, e.g. `"2x Espresso Single, 1x Butter Croissant"`
    pub fn line_summary(&self) -> &str {
        &self.line_summary
    }

    /// How the sale was paid for
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }
}

/// Ledger
#[derive(Debug, Default)]
pub struct Ledger {
    records: VecDeque<SaleRecord>,
    ids: FxHashSet<SaleId>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records, most recent first. Each call starts a fresh iteration.
    pub fn history(
        &self,
    ) -> impl DoubleEndedIterator<Item = &SaleRecord> + ExactSizeIterator + Clone {
        self.records.iter()
    }

    /// The most recent sale.
    pub fn latest(&self) -> Option<&SaleRecord> {
        self.records.front()
    }

    /// Look up a sale by id.
    pub fn get(&self, id: &SaleId) -> Option<&SaleRecord> {
        if !self.ids.contains(id) {
            return None;
        }

        self.records.iter().find(|record| record.id() == id)
    }

    /// Check whether a sale id has already been used.
    pub fn contains(&self, id: &SaleId) -> bool {
        self.ids.contains(id)
    }

    /// Number of sales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no sales yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Prepend `record`. The caller guarantees its id is unused.
    pub(crate) fn append(&mut self, record: SaleRecord) {
        debug_assert!(
            !self.ids.contains(record.id()),
            "duplicate sale id {}",
            record.id()
        );

        self.ids.insert(record.id().clone());
        self.records.push_front(record);
    }
}
