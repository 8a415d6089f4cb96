//! Lotto trade ledger - main entry point
//!
//! CLI front-end over the ledger engine. Subcommands mirror the chat
//! command set: open, close, edit, tag, list, history, leaderboard,
//! export, purge, reset, expire.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lotto_ledger::{Config, LedgerEngine, Money, SqliteLedgerStore};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "lotto-ledger")]
#[command(about = "Simulated options trade ledger with per-user statistics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (defaults used when absent)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log a new trade
    Open {
        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Ticker symbol, e.g. SPY
        ticker: String,

        /// Strike and option type, e.g. 450C
        strike: String,

        /// Expiry date (YYYY-MM-DD)
        expiry: String,

        /// Entry price per share, (0, 100]
        entry_price: Money,

        /// Number of contracts
        #[arg(default_value = "1")]
        quantity: u32,
    },

    /// Close a trade for profit/loss
    Close {
        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Exit price per share
        exit_price: Money,

        /// Trade id or 3-character suffix; defaults to the latest open trade
        id: Option<String>,
    },

    /// Edit a field on an open trade
    Edit {
        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Trade id or 3-character suffix
        id: String,

        /// Field to change: entry_price, quantity, strike_descriptor, expiry
        field: String,

        /// New value
        value: String,
    },

    /// Tag a closed trade as paper hands
    Tag {
        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Trade owner, when tagging someone else's trade (moderators only)
        #[arg(long)]
        target: Option<String>,

        /// Trade id or 3-character suffix
        id: String,

        /// Remove the tag instead of setting it
        #[arg(long)]
        clear: bool,

        /// Caller holds moderator privilege (verified upstream)
        #[arg(long = "mod")]
        is_mod: bool,
    },

    /// Show your open trades
    List {
        /// Acting user
        #[arg(short, long)]
        user: String,
    },

    /// Paginated closed-trade log
    History {
        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Show every user's history (moderators only)
        #[arg(long)]
        all: bool,

        /// Caller holds moderator privilege (verified upstream)
        #[arg(long = "mod")]
        is_mod: bool,
    },

    /// Rank users by average % gain
    Leaderboard,

    /// Export your trade history as CSV
    Export {
        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Output file (default trade_history.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a trade, rolling back its statistics
    Purge {
        /// Acting user
        #[arg(short, long)]
        user: String,

        /// Trade owner, when purging someone else's trade (moderators only)
        #[arg(long)]
        target: Option<String>,

        /// Trade id or 3-character suffix
        id: String,

        /// Caller holds moderator privilege (verified upstream)
        #[arg(long = "mod")]
        is_mod: bool,
    },

    /// Wipe ALL trades and stats
    Reset {
        /// Actually do it; without this flag nothing changes
        #[arg(long)]
        confirm: bool,
    },

    /// Force-close all trades past their expiry date as a full loss
    Expire,
}

fn setup_logging(verbose: bool) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    let level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::daily("logs", "lotto-ledger.log");

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(true);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };
    info!("Ledger database: {}", config.db_path.display());

    let store = SqliteLedgerStore::open(&config.db_path, config.mirror_path.clone())?;
    let engine = LedgerEngine::new(Arc::new(store));

    match cli.command {
        Commands::Open {
            user,
            ticker,
            strike,
            expiry,
            entry_price,
            quantity,
        } => commands::trade::open(&engine, user, ticker, strike, expiry, entry_price, quantity),
        Commands::Close {
            user,
            exit_price,
            id,
        } => commands::trade::close(&engine, user, id, exit_price),
        Commands::Edit {
            user,
            id,
            field,
            value,
        } => commands::trade::edit(&engine, user, id, field, value),
        Commands::Tag {
            user,
            target,
            id,
            clear,
            is_mod,
        } => commands::trade::tag(&engine, user, target, id, clear, is_mod),
        Commands::List { user } => commands::trade::list(&engine, user),
        Commands::History { user, all, is_mod } => {
            commands::trade::history(&engine, user, all, is_mod)
        }
        Commands::Leaderboard => commands::trade::leaderboard(&engine),
        Commands::Export { user, output } => commands::trade::export(&engine, user, output),
        Commands::Purge {
            user,
            target,
            id,
            is_mod,
        } => commands::admin::purge(&engine, user, target, id, is_mod),
        Commands::Reset { confirm } => commands::admin::reset(&engine, confirm),
        Commands::Expire => commands::admin::expire(&engine),
    }
}
