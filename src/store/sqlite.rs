//! SQLite-backed ledger store with JSON mirror
//!
//! Durable persistence for the trades and users collections. Every mutation
//! commits to SQLite before returning; when a mirror path is configured the
//! full ledger state is additionally exported to a JSON file, best-effort.
//! A mirror failure is logged and never fails the primary write.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, Connection};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use super::{LedgerStore, TradeFilter};
use crate::types::{Money, TradeId, TradeRecord, TradeStatus, UserStats};

const TRADE_COLUMNS: &str = "id, owner, ticker, strike_descriptor, expiry, entry_price, \
     quantity, status, opened_at, exit_price, closed_at, profit_loss, percent_gain, \
     paper_hands_tagged";

pub struct SqliteLedgerStore {
    conn: Arc<Mutex<Connection>>,
    mirror_path: Option<PathBuf>,
}

impl SqliteLedgerStore {
    /// Open (or create) the database file, optionally mirroring every write
    /// to a JSON snapshot at `mirror_path`.
    pub fn open<P: AsRef<Path>>(db_path: P, mirror_path: Option<PathBuf>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if let Some(parent) = mirror_path.as_ref().and_then(|p| p.parent()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        // WAL for better concurrency between readers and the writer
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            mirror_path,
        };
        store.create_tables()?;
        info!("Ledger store initialized at {}", db_path.display());

        Ok(store)
    }

    /// In-memory store, used by tests. No mirror.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            mirror_path: None,
        };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS trades (
                id TEXT NOT NULL,
                owner TEXT NOT NULL,
                ticker TEXT NOT NULL,
                strike_descriptor TEXT NOT NULL,
                expiry TEXT NOT NULL,
                entry_price TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                status TEXT NOT NULL,
                opened_at TEXT NOT NULL,
                exit_price TEXT,
                closed_at TEXT,
                profit_loss TEXT,
                percent_gain TEXT,
                paper_hands_tagged INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (owner, id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                owner TEXT PRIMARY KEY,
                cumulative_profit_loss TEXT NOT NULL,
                cumulative_percent_gain TEXT NOT NULL,
                closed_count INTEGER NOT NULL,
                win_count INTEGER NOT NULL,
                loss_count INTEGER NOT NULL,
                id_counter INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_trades_owner_status ON trades(owner, status)",
            [],
        )?;

        debug!("Database schema created/verified");
        Ok(())
    }

    /// Export the whole ledger to the mirror file. Best-effort: failures are
    /// logged, never propagated, so the durable primary write stands alone.
    fn mirror(&self) {
        let Some(path) = self.mirror_path.clone() else {
            return;
        };
        if let Err(e) = self.write_mirror(&path) {
            warn!("Mirror export to {} failed: {:#}", path.display(), e);
        }
    }

    fn write_mirror(&self, path: &Path) -> Result<()> {
        let trades = self.find_trades(&TradeFilter::default())?;
        let users = self.all_stats()?;

        let snapshot = serde_json::json!({
            "exported_at": Utc::now().to_rfc3339(),
            "trades": trades,
            "users": users,
        });

        std::fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;
        debug!("Ledger mirrored to {}", path.display());
        Ok(())
    }
}

// -- row mapping -------------------------------------------------------------

fn conv_err<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn money_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Money> {
    let text: String = row.get(idx)?;
    Money::from_str(&text).map_err(|e| conv_err(idx, e))
}

fn opt_money_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<Money>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|s| Money::from_str(&s).map_err(|e| conv_err(idx, e)))
        .transpose()
}

fn timestamp_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| conv_err(idx, e))
}

fn opt_timestamp_col(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| conv_err(idx, e))
    })
    .transpose()
}

fn row_to_trade(row: &rusqlite::Row<'_>) -> rusqlite::Result<TradeRecord> {
    let id: String = row.get(0)?;
    let expiry_text: String = row.get(4)?;
    let status_text: String = row.get(7)?;

    Ok(TradeRecord {
        id: TradeId::from_token(&id),
        owner: row.get(1)?,
        ticker: row.get(2)?,
        strike_descriptor: row.get(3)?,
        expiry: NaiveDate::parse_from_str(&expiry_text, "%Y-%m-%d")
            .map_err(|e| conv_err(4, e))?,
        entry_price: money_col(row, 5)?,
        quantity: row.get::<_, i64>(6)? as u32,
        status: TradeStatus::parse(&status_text)
            .ok_or_else(|| conv_err(7, InvalidColumn(status_text.clone())))?,
        opened_at: timestamp_col(row, 8)?,
        exit_price: opt_money_col(row, 9)?,
        closed_at: opt_timestamp_col(row, 10)?,
        profit_loss: opt_money_col(row, 11)?,
        percent_gain: opt_money_col(row, 12)?,
        paper_hands_tagged: row.get::<_, i64>(13)? != 0,
    })
}

fn row_to_stats(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserStats> {
    Ok(UserStats {
        owner: row.get(0)?,
        cumulative_profit_loss: money_col(row, 1)?,
        cumulative_percent_gain: money_col(row, 2)?,
        closed_count: row.get::<_, i64>(3)? as u32,
        win_count: row.get::<_, i64>(4)? as u32,
        loss_count: row.get::<_, i64>(5)? as u32,
        id_counter: row.get::<_, i64>(6)? as u64,
    })
}

#[derive(Debug)]
struct InvalidColumn(String);

impl std::fmt::Display for InvalidColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid column value '{}'", self.0)
    }
}

impl std::error::Error for InvalidColumn {}

// -- trait implementation ----------------------------------------------------

impl LedgerStore for SqliteLedgerStore {
    fn insert_trade(&self, record: &TradeRecord) -> Result<()> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                &format!("INSERT INTO trades ({TRADE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"),
                params![
                    record.id.as_str(),
                    record.owner,
                    record.ticker,
                    record.strike_descriptor,
                    record.expiry.to_string(),
                    record.entry_price.to_string(),
                    record.quantity as i64,
                    record.status.as_str(),
                    record.opened_at.to_rfc3339(),
                    record.exit_price.map(|m| m.to_string()),
                    record.closed_at.map(|t| t.to_rfc3339()),
                    record.profit_loss.map(|m| m.to_string()),
                    record.percent_gain.map(|m| m.to_string()),
                    record.paper_hands_tagged as i64,
                ],
            )?;
        }

        debug!(
            "Trade inserted: {} {} {} @ {}",
            record.id, record.ticker, record.strike_descriptor, record.entry_price
        );
        self.mirror();
        Ok(())
    }

    fn get_trade(&self, owner: &str, id: &TradeId) -> Result<Option<TradeRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRADE_COLUMNS} FROM trades WHERE owner = ?1 AND id = ?2"
        ))?;

        match stmt.query_row(params![owner, id.as_str()], row_to_trade) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_trades(&self, filter: &TradeFilter) -> Result<Vec<TradeRecord>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = format!("SELECT {TRADE_COLUMNS} FROM trades");
        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(owner) = &filter.owner {
            clauses.push("owner = ?");
            args.push(owner.clone());
        }
        if let Some(status) = filter.status {
            clauses.push("status = ?");
            args.push(status.as_str().to_string());
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        // insertion order is part of the store contract
        sql.push_str(" ORDER BY rowid");

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(args.iter()), row_to_trade)?
            .collect::<Result<Vec<_>, _>>()?;

        // suffix predicate stays engine-side, independent of SQL
        Ok(records
            .into_iter()
            .filter(|r| filter.matches_suffix(r))
            .collect())
    }

    fn update_trade(&self, record: &TradeRecord) -> Result<()> {
        {
            let conn = self.conn.lock().unwrap();
            let changed = conn.execute(
                "UPDATE trades SET ticker = ?3, strike_descriptor = ?4, expiry = ?5,
                     entry_price = ?6, quantity = ?7, status = ?8, opened_at = ?9,
                     exit_price = ?10, closed_at = ?11, profit_loss = ?12,
                     percent_gain = ?13, paper_hands_tagged = ?14
                 WHERE owner = ?1 AND id = ?2",
                params![
                    record.owner,
                    record.id.as_str(),
                    record.ticker,
                    record.strike_descriptor,
                    record.expiry.to_string(),
                    record.entry_price.to_string(),
                    record.quantity as i64,
                    record.status.as_str(),
                    record.opened_at.to_rfc3339(),
                    record.exit_price.map(|m| m.to_string()),
                    record.closed_at.map(|t| t.to_rfc3339()),
                    record.profit_loss.map(|m| m.to_string()),
                    record.percent_gain.map(|m| m.to_string()),
                    record.paper_hands_tagged as i64,
                ],
            )?;
            if changed == 0 {
                anyhow::bail!("update targeted missing trade {}", record.id);
            }
        }

        self.mirror();
        Ok(())
    }

    fn remove_trade(&self, owner: &str, id: &TradeId) -> Result<bool> {
        let removed = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "DELETE FROM trades WHERE owner = ?1 AND id = ?2",
                params![owner, id.as_str()],
            )? > 0
        };

        if removed {
            self.mirror();
        }
        Ok(removed)
    }

    fn truncate_trades(&self) -> Result<()> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute("DELETE FROM trades", [])?;
        }
        self.mirror();
        Ok(())
    }

    fn get_stats(&self, owner: &str) -> Result<Option<UserStats>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT owner, cumulative_profit_loss, cumulative_percent_gain,
                    closed_count, win_count, loss_count, id_counter
             FROM users WHERE owner = ?1",
        )?;

        match stmt.query_row(params![owner], row_to_stats) {
            Ok(stats) => Ok(Some(stats)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn upsert_stats(&self, stats: &UserStats) -> Result<()> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT OR REPLACE INTO users
                 (owner, cumulative_profit_loss, cumulative_percent_gain,
                  closed_count, win_count, loss_count, id_counter)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    stats.owner,
                    stats.cumulative_profit_loss.to_string(),
                    stats.cumulative_percent_gain.to_string(),
                    stats.closed_count as i64,
                    stats.win_count as i64,
                    stats.loss_count as i64,
                    stats.id_counter as i64,
                ],
            )?;
        }

        self.mirror();
        Ok(())
    }

    fn all_stats(&self) -> Result<Vec<UserStats>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT owner, cumulative_profit_loss, cumulative_percent_gain,
                    closed_count, win_count, loss_count, id_counter
             FROM users ORDER BY rowid",
        )?;

        let stats = stmt
            .query_map([], row_to_stats)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stats)
    }

    fn truncate_stats(&self) -> Result<()> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute("DELETE FROM users", [])?;
        }
        self.mirror();
        Ok(())
    }
}
