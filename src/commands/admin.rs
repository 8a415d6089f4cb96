//! Moderation and maintenance commands

use anyhow::Result;
use chrono::Utc;
use lotto_ledger::LedgerEngine;
use tracing::info;

pub fn purge(
    engine: &LedgerEngine,
    user: String,
    target: Option<String>,
    id: String,
    is_mod: bool,
) -> Result<()> {
    let target = target.unwrap_or_else(|| user.clone());
    let purged = engine.purge(&user, &target, &id, is_mod)?;

    println!("Trade purged: {} (owner {})", purged, target);
    Ok(())
}

pub fn reset(engine: &LedgerEngine, confirmed: bool) -> Result<()> {
    if engine.reset(confirmed)? {
        println!("All trades & stats wiped. Fresh start!");
    } else {
        println!("Reset not confirmed; nothing changed. Re-run with --confirm to proceed.");
    }
    Ok(())
}

/// Run the expiry sweep now. Scheduling is the caller's concern; a daily
/// cron entry is the expected driver.
pub fn expire(engine: &LedgerEngine) -> Result<()> {
    let now = Utc::now();
    let closed = engine.expire_due(now.date_naive(), now)?;

    info!("Expiry sweep closed {} trades", closed);
    if closed == 0 {
        println!("No overdue trades.");
    } else {
        println!("Auto-closed {} expired trade(s) as a full loss.", closed);
    }
    Ok(())
}
