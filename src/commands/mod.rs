//! CLI command implementations
//!
//! Each submodule is one user-facing command over the ledger engine. The
//! CLI stands in for the chat transport: it supplies the caller identity,
//! the pre-resolved moderator flag, and the current clock, then formats
//! whatever the engine returns.

pub mod admin;
pub mod trade;

use lotto_ledger::{Money, TradeRecord};

/// Sign-prefixed money rendering for P/L and percent figures.
pub(crate) fn signed(value: Money) -> String {
    if value.is_negative() {
        value.to_string()
    } else {
        format!("+{}", value)
    }
}

/// One-line trade summary shared by list and history output.
pub(crate) fn trade_line(trade: &TradeRecord) -> String {
    match trade.percent_gain {
        Some(pct) => format!(
            "{} - {} {} {}  ->  {}%{}",
            trade.id,
            trade.ticker,
            trade.strike_descriptor,
            trade.expiry,
            signed(pct.round_dp(1)),
            if trade.paper_hands_tagged {
                "  [paper hands]"
            } else {
                ""
            }
        ),
        None => format!(
            "{} - {} {} @ ${} x{}",
            trade.id, trade.ticker, trade.strike_descriptor, trade.entry_price, trade.quantity
        ),
    }
}
