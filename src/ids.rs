//! Identifiers
//!
//! Catalog items are keyed by a monotonically increasing integer, sales by a short
//! human-legible code. Both are drawn from an [`IdGenerator`] so sessions can swap
//! in a deterministic source.

use std::fmt;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

/// Characters a sale id is drawn from.
const SALE_ID_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of a generated sale id.
pub const SALE_ID_LEN: usize = 9;

/// Catalog item identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Wrap a raw item id.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Sale (transaction) identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(String);

impl SaleId {
    /// Wrap a sale id.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh identifiers for catalog items and sales.
///
/// Implementations only need to make collisions unlikely; the catalog and the
/// ledger reject or retry ids they have already seen.
pub trait IdGenerator {
    /// Next catalog item id.
    fn next_item_id(&mut self) -> ItemId;

    /// Next sale id.
    fn next_sale_id(&mut self) -> SaleId;
}

/// Default generator: sequential item ids, random alphanumeric sale ids.
#[derive(Debug)]
pub struct RandomIds<R = StdRng> {
    next_item: u64,
    rng: R,
}

impl RandomIds<StdRng> {
    /// Create a generator seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a generator with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for RandomIds<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomIds<R> {
    /// Create a generator drawing sale ids from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self { next_item: 1, rng }
    }
}

impl<R: Rng> IdGenerator for RandomIds<R> {
    fn next_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item);
        self.next_item = self.next_item.saturating_add(1);

        id
    }

    fn next_sale_id(&mut self) -> SaleId {
        let code = (0..SALE_ID_LEN)
            .filter_map(|_| SALE_ID_ALPHABET.choose(&mut self.rng).copied())
            .map(char::from)
            .collect::<String>();

        SaleId(code)
    }
}

/// Deterministic generator: item ids count up from 1, sale ids are `S00000001`, `S00000002`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next_item: u64,
    next_sale: u64,
}

impl SequentialIds {
    /// Create a generator starting both sequences at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_item: 1,
            next_sale: 1,
        }
    }

    /// Create a generator whose item ids start at `first`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next_item: first,
            next_sale: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item);
        self.next_item = self.next_item.saturating_add(1);

        id
    }

    fn next_sale_id(&mut self) -> SaleId {
        let id = SaleId(format!("S{:0width$}", self.next_sale, width = SALE_ID_LEN - 1));
        self.next_sale = self.next_sale.saturating_add(1);

        id
    }
}
