//! Trade lifecycle and reporting commands

use anyhow::Result;
use chrono::Utc;
use lotto_ledger::{export, LedgerEngine, Money};
use std::path::PathBuf;
use tracing::info;

use super::{signed, trade_line};

pub fn open(
    engine: &LedgerEngine,
    user: String,
    ticker: String,
    strike: String,
    expiry: String,
    entry_price: Money,
    quantity: u32,
) -> Result<()> {
    let record = engine.open(
        &user,
        &ticker,
        &strike,
        &expiry,
        entry_price,
        quantity,
        Utc::now(),
    )?;

    println!(
        "Trade logged: {} - {} {} @ ${} x{}",
        record.id, record.ticker, record.strike_descriptor, record.entry_price, record.quantity
    );
    // price is per share; one contract covers 100 shares
    println!(
        "  ~ ${} per contract",
        (record.entry_price * Money::ONE_HUNDRED).round_dp(0)
    );
    Ok(())
}

pub fn close(
    engine: &LedgerEngine,
    user: String,
    id: Option<String>,
    exit_price: Money,
) -> Result<()> {
    let record = engine.close(&user, id.as_deref(), exit_price, Utc::now())?;

    let pl = record.profit_loss.unwrap_or(Money::ZERO);
    let pct = record.percent_gain.unwrap_or(Money::ZERO);
    println!(
        "Trade closed: {} - ${} ({}%)",
        record.id,
        signed(pl.round_dp(2)),
        signed(pct.round_dp(1))
    );
    Ok(())
}

pub fn edit(
    engine: &LedgerEngine,
    user: String,
    id: String,
    field: String,
    value: String,
) -> Result<()> {
    let today = Utc::now().date_naive();
    let record = engine.edit(&user, &id, &field, &value, today)?;

    println!("Trade updated: {}", trade_line(&record));
    Ok(())
}

pub fn tag(
    engine: &LedgerEngine,
    user: String,
    target: Option<String>,
    id: String,
    clear: bool,
    is_mod: bool,
) -> Result<()> {
    let target = target.unwrap_or_else(|| user.clone());
    let record = engine.tag(&user, &target, &id, !clear, is_mod)?;

    if record.paper_hands_tagged {
        println!("Tagged {} as paper hands", record.id);
    } else {
        println!("Cleared paper-hands tag on {}", record.id);
    }
    Ok(())
}

pub fn list(engine: &LedgerEngine, user: String) -> Result<()> {
    let open = engine.list_open(&user)?;
    if open.is_empty() {
        println!("You have no open trades.");
        return Ok(());
    }

    println!("Open trades for {}:", user);
    for trade in &open {
        println!("  {}", trade_line(trade));
    }
    Ok(())
}

pub fn history(engine: &LedgerEngine, user: String, all: bool, is_mod: bool) -> Result<()> {
    let pages = engine.history(&user, all, is_mod)?;
    if pages.is_empty() {
        println!("No closed trades yet.");
        return Ok(());
    }

    let total = pages.len();
    for (i, page) in pages.iter().enumerate() {
        println!("--- Page {}/{} ---", i + 1, total);
        for trade in page {
            println!("  {}", trade_line(trade));
        }
    }
    Ok(())
}

pub fn leaderboard(engine: &LedgerEngine) -> Result<()> {
    let ranked = engine.leaderboard()?;
    if ranked.is_empty() {
        println!("No closed trades yet.");
        return Ok(());
    }

    println!("% Gain Leaderboard");
    for (i, entry) in ranked.iter().enumerate() {
        println!(
            "{}. {} - {}% | ${} ({}W/{}L)",
            i + 1,
            entry.owner,
            signed(entry.avg_percent_gain.round_dp(1)),
            signed(entry.cumulative_profit_loss.round_dp(2)),
            entry.win_count,
            entry.loss_count
        );
    }
    Ok(())
}

pub fn export(engine: &LedgerEngine, user: String, output: Option<PathBuf>) -> Result<()> {
    let records = engine.export(&user)?;
    if records.is_empty() {
        println!("You have no trades logged yet.");
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from("trade_history.csv"));
    let file = std::fs::File::create(&path)?;
    export::write_csv(&records, file)?;

    info!("Exported {} trades for {}", records.len(), user);
    println!("Exported {} trades to {}", records.len(), path.display());
    Ok(())
}
