//! Durable document store abstraction
//!
//! The ledger engine talks to storage exclusively through [`LedgerStore`],
//! two logical collections (`trades`, `users`) behind a typed query
//! abstraction. Predicates are explicit filter structs rather than ad hoc
//! query objects, keeping the engine independent of the storage engine's
//! native query language.

mod sqlite;

pub use sqlite::SqliteLedgerStore;

use anyhow::Result;

use crate::types::{TradeId, TradeRecord, TradeStatus, UserStats};

/// Typed predicate over the trades collection.
///
/// All fields are conjunctive; `None` means "any". Suffix matching is a
/// string-suffix test against the full identifier.
#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub owner: Option<String>,
    pub status: Option<TradeStatus>,
    pub id_suffix: Option<String>,
}

impl TradeFilter {
    pub fn by_owner(owner: &str) -> Self {
        TradeFilter {
            owner: Some(owner.to_string()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: TradeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.id_suffix = Some(suffix.to_string());
        self
    }

    /// Apply the suffix part of the predicate (owner/status are pushed down
    /// into the storage engine; suffix matching stays engine-side).
    pub fn matches_suffix(&self, record: &TradeRecord) -> bool {
        match &self.id_suffix {
            Some(suffix) => record.id.matches_suffix(suffix),
            None => true,
        }
    }
}

/// Contract between the ledger core and whatever durable store backs it.
///
/// Implementations must preserve insertion order in `find_trades` results;
/// "most recently opened" selection and suffix first-match both lean on it.
pub trait LedgerStore: Send + Sync {
    // -- trades collection ---------------------------------------------------

    fn insert_trade(&self, record: &TradeRecord) -> Result<()>;

    /// Exact-identifier lookup scoped to an owner.
    fn get_trade(&self, owner: &str, id: &TradeId) -> Result<Option<TradeRecord>>;

    /// All trades matching the filter, in insertion order.
    fn find_trades(&self, filter: &TradeFilter) -> Result<Vec<TradeRecord>>;

    /// Whole-record replace keyed by (owner, id).
    fn update_trade(&self, record: &TradeRecord) -> Result<()>;

    /// Returns true when a record was deleted.
    fn remove_trade(&self, owner: &str, id: &TradeId) -> Result<bool>;

    fn truncate_trades(&self) -> Result<()>;

    // -- users collection ----------------------------------------------------

    fn get_stats(&self, owner: &str) -> Result<Option<UserStats>>;

    /// Insert-or-replace keyed by owner.
    fn upsert_stats(&self, stats: &UserStats) -> Result<()>;

    /// All user statistics records, in insertion order.
    fn all_stats(&self) -> Result<Vec<UserStats>>;

    fn truncate_stats(&self) -> Result<()>;
}
