//! Lotto Trade Ledger
//!
//! A trade ledger and statistics engine for community "lotto" options
//! tracking: trade lifecycle management, incremental per-user aggregates,
//! partial-identifier resolution, leaderboard ranking, and a bulk
//! auto-expiry sweep, backed by SQLite with an optional JSON mirror.

pub mod config;
pub mod error;
pub mod export;
pub mod ledger;
pub mod stats;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{LedgerError, LedgerResult};
pub use ledger::LedgerEngine;
pub use store::{LedgerStore, SqliteLedgerStore, TradeFilter};
pub use types::*;
