//! Ledger error taxonomy
//!
//! Every engine operation returns either a success payload or one of these
//! structured failures. The engine performs no internal retries; transient
//! storage failures propagate as `Store` for the caller to decide.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed or out-of-range input: bad date, price outside (0, 100],
    /// non-positive quantity, disallowed edit field.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Identifier or suffix does not resolve to a record matching the
    /// owner and status constraints.
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation not permitted in the record's current lifecycle state,
    /// e.g. editing an expired trade.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Actor lacks rights for a cross-owner operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Underlying durable-store failure, propagated as-is.
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
