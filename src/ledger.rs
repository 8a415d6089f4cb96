//! Ledger engine - trade lifecycle orchestration
//!
//! Implements the lifecycle operations (open, edit, close, tag, purge,
//! reset, expiry sweep) plus the read projections (list, history,
//! leaderboard, export) as atomic-per-record transitions over the store
//! and the statistics aggregator.
//!
//! Two rules apply everywhere:
//! - Mutations touching an owner's records or stats run under that owner's
//!   lock; trade identifiers are owner-scoped, so the per-owner lock also
//!   serializes per-record read-modify-write. Cross-owner work is parallel.
//! - `now`/`today` are explicit parameters. The engine never reads an
//!   ambient clock, which keeps every transition deterministic and testable.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::stats;
use crate::store::{LedgerStore, TradeFilter};
use crate::types::{
    is_suffix_token, normalize_dashes, parse_expiry, percent_gain, profit_loss,
    validate_entry_price, validate_exit_price, validate_quantity, LeaderboardEntry, Money,
    TradeEdit, TradeId, TradeRecord, TradeStatus, HISTORY_PAGE_SIZE, LEADERBOARD_LIMIT,
};

pub struct LedgerEngine {
    store: Arc<dyn LedgerStore>,
    owner_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LedgerEngine {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        LedgerEngine {
            store,
            owner_locks: Mutex::new(HashMap::new()),
        }
    }

    fn owner_lock(&self, owner: &str) -> Arc<Mutex<()>> {
        let mut locks = self.owner_locks.lock().unwrap();
        locks
            .entry(owner.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Resolve a user-typed identifier token for `owner`: exact id first,
    /// then 3-character counter-suffix fallback. The optional status
    /// constraint applies to both paths. First match wins on suffix hits.
    fn resolve(
        &self,
        owner: &str,
        token: &str,
        status: Option<TradeStatus>,
    ) -> LedgerResult<TradeRecord> {
        let normalized = normalize_dashes(token);

        let exact = TradeId::from_token(&normalized);
        if let Some(record) = self.store.get_trade(owner, &exact)? {
            if status.is_none() || status == Some(record.status) {
                return Ok(record);
            }
        }

        if is_suffix_token(&normalized) {
            let mut filter = TradeFilter::by_owner(owner).with_suffix(&normalized);
            filter.status = status;
            if let Some(record) = self.store.find_trades(&filter)?.into_iter().next() {
                return Ok(record);
            }
        }

        Err(match status {
            Some(status) => LedgerError::NotFound(format!(
                "no {} trade matching '{}' for this user",
                status, token
            )),
            None => LedgerError::NotFound(format!("no trade matching '{}' for this user", token)),
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle operations
    // ------------------------------------------------------------------

    /// Open a new trade. Validates everything before allocating an
    /// identifier, so a rejected open writes no state at all.
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        &self,
        owner: &str,
        ticker: &str,
        strike_descriptor: &str,
        expiry: &str,
        entry_price: Money,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> LedgerResult<TradeRecord> {
        let expiry = parse_expiry(expiry)?;
        validate_entry_price(entry_price)?;
        validate_quantity(quantity)?;

        let lock = self.owner_lock(owner);
        let _guard = lock.lock().unwrap();

        // Counter persists even if the insert below fails; an identifier
        // gap is accepted over gapless sequencing.
        let id = stats::allocate_id(self.store.as_ref(), owner)?;
        let record = TradeRecord {
            id,
            owner: owner.to_string(),
            ticker: ticker.to_uppercase(),
            strike_descriptor: strike_descriptor.to_uppercase(),
            expiry,
            entry_price,
            quantity,
            status: TradeStatus::Open,
            opened_at: now,
            exit_price: None,
            closed_at: None,
            profit_loss: None,
            percent_gain: None,
            paper_hands_tagged: false,
        };
        self.store.insert_trade(&record)?;

        info!(
            "Opened {}: {} {} @ {} x{}",
            record.id, record.ticker, record.strike_descriptor, record.entry_price, record.quantity
        );
        Ok(record)
    }

    /// Apply a single-field update to an open, not-yet-expired trade.
    /// Never touches statistics (open trades carry none).
    pub fn edit(
        &self,
        owner: &str,
        token: &str,
        field: &str,
        value: &str,
        today: NaiveDate,
    ) -> LedgerResult<TradeRecord> {
        let lock = self.owner_lock(owner);
        let _guard = lock.lock().unwrap();

        let mut record = self.resolve(owner, token, Some(TradeStatus::Open))?;
        if record.expiry <= today {
            return Err(LedgerError::InvalidState(format!(
                "trade {} expired on {}; expired trades cannot be edited",
                record.id, record.expiry
            )));
        }

        match TradeEdit::parse(field, value)? {
            TradeEdit::EntryPrice(price) => record.entry_price = price,
            TradeEdit::Quantity(quantity) => record.quantity = quantity,
            TradeEdit::StrikeDescriptor(strike) => record.strike_descriptor = strike,
            TradeEdit::Expiry(expiry) => record.expiry = expiry,
        }
        self.store.update_trade(&record)?;

        info!("Edited {}: {} updated", record.id, field);
        Ok(record)
    }

    /// Close a trade at `exit_price`. With no identifier, the caller's most
    /// recently opened trade (store-insertion order) is closed.
    pub fn close(
        &self,
        owner: &str,
        token: Option<&str>,
        exit_price: Money,
        now: DateTime<Utc>,
    ) -> LedgerResult<TradeRecord> {
        validate_exit_price(exit_price)?;

        let lock = self.owner_lock(owner);
        let _guard = lock.lock().unwrap();

        let record = match token {
            Some(token) => self.resolve(owner, token, Some(TradeStatus::Open))?,
            None => {
                let open = self
                    .store
                    .find_trades(&TradeFilter::by_owner(owner).with_status(TradeStatus::Open))?;
                open.into_iter().last().ok_or_else(|| {
                    LedgerError::NotFound("no open trades to close".to_string())
                })?
            }
        };

        self.close_record(record, exit_price, now)
    }

    /// Shared close transition: recompute P/L and percent from scratch,
    /// stamp the close, then fold into the owner's aggregates. The two
    /// writes are not atomic; a stats failure after the record write is
    /// logged loudly and propagated (spec'd at-least-once gap).
    fn close_record(
        &self,
        mut record: TradeRecord,
        exit_price: Money,
        now: DateTime<Utc>,
    ) -> LedgerResult<TradeRecord> {
        let pl = profit_loss(record.entry_price, exit_price, record.quantity);
        let pct = percent_gain(record.entry_price, exit_price);

        record.status = TradeStatus::Closed;
        record.exit_price = Some(exit_price);
        record.closed_at = Some(now);
        record.profit_loss = Some(pl);
        record.percent_gain = Some(pct);
        self.store.update_trade(&record)?;

        if let Err(e) = stats::record_close(self.store.as_ref(), &record.owner, pl, pct) {
            warn!(
                "Trade {} closed but stats update failed; aggregates are stale: {:#}",
                record.id, e
            );
            return Err(e.into());
        }

        info!("Closed {}: {} ({}%)", record.id, pl, pct.round_dp(1));
        Ok(record)
    }

    /// Set or clear the paper-hands tag on a closed trade. Cosmetic only.
    pub fn tag(
        &self,
        actor: &str,
        target_owner: &str,
        token: &str,
        tagged: bool,
        is_privileged: bool,
    ) -> LedgerResult<TradeRecord> {
        if actor != target_owner && !is_privileged {
            return Err(LedgerError::PermissionDenied(
                "only moderators can tag another user's trade".to_string(),
            ));
        }

        let lock = self.owner_lock(target_owner);
        let _guard = lock.lock().unwrap();

        let mut record = self.resolve(target_owner, token, Some(TradeStatus::Closed))?;
        record.paper_hands_tagged = tagged;
        self.store.update_trade(&record)?;
        Ok(record)
    }

    /// Delete a trade. Purging a closed trade first reverses its
    /// contribution to the owner's aggregates, using the values stored on
    /// the record before it is deleted.
    pub fn purge(
        &self,
        actor: &str,
        target_owner: &str,
        token: &str,
        is_privileged: bool,
    ) -> LedgerResult<TradeId> {
        if actor != target_owner && !is_privileged {
            return Err(LedgerError::PermissionDenied(
                "only moderators can purge another user's trade".to_string(),
            ));
        }

        let lock = self.owner_lock(target_owner);
        let _guard = lock.lock().unwrap();

        let record = self.resolve(target_owner, token, None)?;
        if record.is_closed() {
            // Reversal must see the pre-deletion values.
            stats::reverse_close(
                self.store.as_ref(),
                target_owner,
                record.profit_loss.unwrap_or(Money::ZERO),
                record.percent_gain.unwrap_or(Money::ZERO),
            )?;
        }
        self.store.remove_trade(target_owner, &record.id)?;

        info!("Purged {} (owner {})", record.id, target_owner);
        Ok(record.id)
    }

    /// Wipe all trades and statistics. Returns false (and does nothing)
    /// unless `confirmed`; confirmation UX belongs to the caller.
    pub fn reset(&self, confirmed: bool) -> LedgerResult<bool> {
        if !confirmed {
            return Ok(false);
        }
        self.store.truncate_trades()?;
        self.store.truncate_stats()?;
        info!("Ledger reset: all trades and stats wiped");
        Ok(true)
    }

    /// Force-close every open trade whose expiry is strictly before
    /// `today`, as a full loss (exit 0, -100%). Returns how many were
    /// closed. Idempotent: a second sweep on the same day finds nothing,
    /// because closed records no longer match the open filter.
    pub fn expire_due(&self, today: NaiveDate, now: DateTime<Utc>) -> LedgerResult<usize> {
        let open = self
            .store
            .find_trades(&TradeFilter::default().with_status(TradeStatus::Open))?;

        let mut expired = 0;
        for candidate in open {
            if candidate.expiry >= today {
                continue;
            }

            let lock = self.owner_lock(&candidate.owner);
            let _guard = lock.lock().unwrap();

            // Re-read under the owner lock; an interactive close may have
            // won the race since the scan.
            let Some(record) = self.store.get_trade(&candidate.owner, &candidate.id)? else {
                continue;
            };
            if record.status != TradeStatus::Open {
                continue;
            }

            let pl = -record.entry_price * Money::from_i64(record.quantity as i64);
            let pct = -Money::ONE_HUNDRED;
            let mut record = record;
            record.status = TradeStatus::Closed;
            record.exit_price = Some(Money::ZERO);
            record.closed_at = Some(now);
            record.profit_loss = Some(pl);
            record.percent_gain = Some(pct);
            self.store.update_trade(&record)?;

            if let Err(e) = stats::record_close(self.store.as_ref(), &record.owner, pl, pct) {
                warn!(
                    "Trade {} expired but stats update failed; aggregates are stale: {:#}",
                    record.id, e
                );
                return Err(e.into());
            }

            info!("Expired {}: {} past {}", record.id, record.ticker, record.expiry);
            expired += 1;
        }

        Ok(expired)
    }

    // ------------------------------------------------------------------
    // Read projections
    // ------------------------------------------------------------------

    /// The caller's open trades, in open order.
    pub fn list_open(&self, owner: &str) -> LedgerResult<Vec<TradeRecord>> {
        Ok(self
            .store
            .find_trades(&TradeFilter::by_owner(owner).with_status(TradeStatus::Open))?)
    }

    /// Closed trades in fixed-size pages, newest close first. With
    /// `all_owners` the scope widens to every user, which requires the
    /// pre-resolved privilege flag.
    pub fn history(
        &self,
        owner: &str,
        all_owners: bool,
        is_privileged: bool,
    ) -> LedgerResult<Vec<Vec<TradeRecord>>> {
        let filter = if all_owners {
            if !is_privileged {
                return Err(LedgerError::PermissionDenied(
                    "only moderators can view the full history".to_string(),
                ));
            }
            TradeFilter::default().with_status(TradeStatus::Closed)
        } else {
            TradeFilter::by_owner(owner).with_status(TradeStatus::Closed)
        };

        let mut closed = self.store.find_trades(&filter)?;
        closed.sort_by(|a, b| b.closed_at.cmp(&a.closed_at));

        Ok(closed
            .chunks(HISTORY_PAGE_SIZE)
            .map(|page| page.to_vec())
            .collect())
    }

    /// Top owners by average percent gain.
    pub fn leaderboard(&self) -> LedgerResult<Vec<LeaderboardEntry>> {
        let mut ranked = stats::rank(self.store.as_ref())?;
        ranked.truncate(LEADERBOARD_LIMIT);
        Ok(ranked)
    }

    /// The owner's full record set, verbatim, for serialization by the
    /// caller.
    pub fn export(&self, owner: &str) -> LedgerResult<Vec<TradeRecord>> {
        Ok(self.store.find_trades(&TradeFilter::by_owner(owner))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteLedgerStore;
    use chrono::TimeZone;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn engine() -> LedgerEngine {
        LedgerEngine::new(Arc::new(SqliteLedgerStore::open_in_memory().unwrap()))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 28, 15, 30, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn open_spy(engine: &LedgerEngine, owner: &str) -> TradeRecord {
        engine
            .open(owner, "spy", "450c", "2026-09-19", money("0.80"), 2, now())
            .unwrap()
    }

    #[test]
    fn test_open_uppercases_and_allocates_sequential_ids() {
        let engine = engine();
        let first = open_spy(&engine, "alice");
        let second = open_spy(&engine, "alice");

        assert_eq!(first.id.as_str(), "alice-001");
        assert_eq!(second.id.as_str(), "alice-002");
        assert_eq!(first.ticker, "SPY");
        assert_eq!(first.strike_descriptor, "450C");
        assert_eq!(first.status, TradeStatus::Open);
    }

    #[test]
    fn test_open_rejects_bad_input_without_side_effects() {
        let engine = engine();
        assert!(matches!(
            engine.open("alice", "SPY", "450C", "soon", money("0.80"), 1, now()),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            engine.open("alice", "SPY", "450C", "2026-09-19", money("150"), 1, now()),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            engine.open("alice", "SPY", "450C", "2026-09-19", money("0.80"), 0, now()),
            Err(LedgerError::Validation(_))
        ));

        // rejected opens must not advance the id counter
        assert_eq!(open_spy(&engine, "alice").id.as_str(), "alice-001");
    }

    #[test]
    fn test_close_by_full_id_and_by_suffix() {
        let engine = engine();
        open_spy(&engine, "alice");
        open_spy(&engine, "alice");

        let closed = engine
            .close("alice", Some("alice-001"), money("1.60"), now())
            .unwrap();
        assert_eq!(closed.profit_loss.unwrap(), money("1.60"));
        assert_eq!(closed.percent_gain.unwrap(), money("100"));

        let closed = engine.close("alice", Some("002"), money("0.40"), now()).unwrap();
        assert_eq!(closed.id.as_str(), "alice-002");
        assert_eq!(closed.profit_loss.unwrap(), money("-0.80"));
    }

    #[test]
    fn test_close_without_id_picks_most_recent_open() {
        let engine = engine();
        open_spy(&engine, "alice");
        let second = open_spy(&engine, "alice");

        let closed = engine.close("alice", None, money("1.00"), now()).unwrap();
        assert_eq!(closed.id, second.id);

        // and reports not-found once nothing is open
        engine.close("alice", None, money("1.00"), now()).unwrap();
        assert!(matches!(
            engine.close("alice", None, money("1.00"), now()),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_close_is_scoped_to_owner_and_open_status() {
        let engine = engine();
        open_spy(&engine, "alice");

        assert!(matches!(
            engine.close("bob", Some("alice-001"), money("1.00"), now()),
            Err(LedgerError::NotFound(_))
        ));

        engine.close("alice", Some("001"), money("1.00"), now()).unwrap();
        // already closed: the open-status constraint makes it unresolvable
        assert!(matches!(
            engine.close("alice", Some("001"), money("2.00"), now()),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_suffix_resolution_never_crosses_owners() {
        let engine = engine();
        for _ in 0..7 {
            open_spy(&engine, "alice");
        }
        for _ in 0..7 {
            open_spy(&engine, "bob");
        }

        let closed = engine.close("alice", Some("007"), money("1.00"), now()).unwrap();
        assert_eq!(closed.id.as_str(), "alice-007");
        let bob_seventh = engine
            .close("bob", Some("007"), money("1.00"), now())
            .unwrap();
        assert_eq!(bob_seventh.id.as_str(), "bob-007");
    }

    #[test]
    fn test_close_accepts_typographic_dashes() {
        let engine = engine();
        open_spy(&engine, "alice");
        let closed = engine
            .close("alice", Some("alice\u{2013}001"), money("1.00"), now())
            .unwrap();
        assert_eq!(closed.id.as_str(), "alice-001");
    }

    #[test]
    fn test_edit_expiry_boundary() {
        let engine = engine();
        open_spy(&engine, "alice");

        // expiry strictly in the future: ok
        let edited = engine
            .edit("alice", "001", "quantity", "5", today())
            .unwrap();
        assert_eq!(edited.quantity, 5);

        // expiry == today: invalid state
        assert!(matches!(
            engine.edit("alice", "001", "quantity", "3", edited.expiry),
            Err(LedgerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_edit_rejects_unknown_field_and_does_not_touch_stats() {
        let engine = engine();
        open_spy(&engine, "alice");

        assert!(matches!(
            engine.edit("alice", "001", "ticker", "QQQ", today()),
            Err(LedgerError::Validation(_))
        ));

        engine.edit("alice", "001", "entry_price", "0.50", today()).unwrap();
        let stats = engine.leaderboard().unwrap();
        assert_eq!(stats[0].win_count + stats[0].loss_count, 0);
        assert_eq!(stats[0].cumulative_profit_loss, Money::ZERO);
    }

    #[test]
    fn test_tag_requires_closed_trade_and_permission() {
        let engine = engine();
        open_spy(&engine, "alice");

        // open trades cannot be tagged
        assert!(matches!(
            engine.tag("alice", "alice", "001", true, false),
            Err(LedgerError::NotFound(_))
        ));

        engine.close("alice", None, money("0.10"), now()).unwrap();
        let tagged = engine.tag("alice", "alice", "001", true, false).unwrap();
        assert!(tagged.paper_hands_tagged);

        assert!(matches!(
            engine.tag("bob", "alice", "001", false, false),
            Err(LedgerError::PermissionDenied(_))
        ));
        let untagged = engine.tag("bob", "alice", "001", false, true).unwrap();
        assert!(!untagged.paper_hands_tagged);
    }

    #[test]
    fn test_purge_permission_and_stats_rollback() {
        let engine = engine();
        open_spy(&engine, "alice");
        engine.close("alice", None, money("1.60"), now()).unwrap();

        assert!(matches!(
            engine.purge("bob", "alice", "alice-001", false),
            Err(LedgerError::PermissionDenied(_))
        ));

        engine.purge("bob", "alice", "alice-001", true).unwrap();
        // aggregates rolled back to pre-close values
        let board = engine.leaderboard().unwrap();
        assert_eq!(board[0].win_count, 0);
        assert_eq!(board[0].cumulative_profit_loss, Money::ZERO);
        assert!(engine.export("alice").unwrap().is_empty());
    }

    #[test]
    fn test_purge_open_trade_leaves_stats_untouched() {
        let engine = engine();
        open_spy(&engine, "alice");
        open_spy(&engine, "alice");
        engine.close("alice", Some("001"), money("1.60"), now()).unwrap();

        engine.purge("alice", "alice", "002", false).unwrap();

        let board = engine.leaderboard().unwrap();
        assert_eq!(board[0].win_count, 1);
        assert_eq!(board[0].cumulative_profit_loss, money("1.60"));
    }

    #[test]
    fn test_expire_due_closes_overdue_as_full_loss_and_is_idempotent() {
        let engine = engine();
        open_spy(&engine, "alice"); // expires 2026-09-19
        open_spy(&engine, "bob");

        let before_expiry = NaiveDate::from_ymd_opt(2026, 9, 19).unwrap();
        assert_eq!(engine.expire_due(before_expiry, now()).unwrap(), 0);

        let after_expiry = NaiveDate::from_ymd_opt(2026, 9, 20).unwrap();
        assert_eq!(engine.expire_due(after_expiry, now()).unwrap(), 2);
        // same day, second sweep: nothing left open
        assert_eq!(engine.expire_due(after_expiry, now()).unwrap(), 0);

        let record = &engine.export("alice").unwrap()[0];
        assert_eq!(record.exit_price.unwrap(), Money::ZERO);
        assert_eq!(record.profit_loss.unwrap(), money("-1.60"));
        assert_eq!(record.percent_gain.unwrap(), money("-100"));

        let board = engine.leaderboard().unwrap();
        assert_eq!(board[0].loss_count, 1);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let engine = engine();
        open_spy(&engine, "alice");
        engine.close("alice", None, money("1.60"), now()).unwrap();

        assert!(!engine.reset(false).unwrap());
        assert_eq!(engine.export("alice").unwrap().len(), 1);
        assert_eq!(engine.leaderboard().unwrap().len(), 1);

        assert!(engine.reset(true).unwrap());
        assert!(engine.export("alice").unwrap().is_empty());
        assert!(engine.leaderboard().unwrap().is_empty());
    }

    #[test]
    fn test_history_pagination_and_scope() {
        let engine = engine();
        for _ in 0..17 {
            open_spy(&engine, "alice");
            engine.close("alice", None, money("1.00"), now()).unwrap();
        }
        open_spy(&engine, "bob");
        engine.close("bob", None, money("1.00"), now()).unwrap();

        let pages = engine.history("alice", false, false).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), HISTORY_PAGE_SIZE);
        assert_eq!(pages[1].len(), 2);
        assert!(pages.iter().flatten().all(|t| t.owner == "alice"));

        assert!(matches!(
            engine.history("alice", true, false),
            Err(LedgerError::PermissionDenied(_))
        ));
        let all_pages = engine.history("alice", true, true).unwrap();
        assert_eq!(all_pages.iter().flatten().count(), 18);
    }

    #[test]
    fn test_history_sorted_by_close_time_descending() {
        let engine = engine();
        open_spy(&engine, "alice");
        open_spy(&engine, "alice");
        let t1 = Utc.with_ymd_and_hms(2026, 8, 28, 10, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();
        engine.close("alice", Some("001"), money("1.00"), t1).unwrap();
        engine.close("alice", Some("002"), money("1.00"), t2).unwrap();

        let pages = engine.history("alice", false, false).unwrap();
        assert_eq!(pages[0][0].id.as_str(), "alice-002");
        assert_eq!(pages[0][1].id.as_str(), "alice-001");
    }

    #[test]
    fn test_leaderboard_truncates_to_limit() {
        let engine = engine();
        for i in 0..12 {
            let owner = format!("user{:02}", i);
            open_spy(&engine, &owner);
            engine.close(&owner, None, money("1.00"), now()).unwrap();
        }
        assert_eq!(engine.leaderboard().unwrap().len(), LEADERBOARD_LIMIT);
    }

    #[test]
    fn test_round_trip_open_close_purge_restores_stats() {
        let engine = engine();
        open_spy(&engine, "alice");
        engine.close("alice", None, money("0.40"), now()).unwrap();
        let before = engine.leaderboard().unwrap();

        open_spy(&engine, "alice");
        engine.close("alice", None, money("1.60"), now()).unwrap();
        engine.purge("alice", "alice", "alice-002", false).unwrap();

        let after = engine.leaderboard().unwrap();
        assert_eq!(before[0].avg_percent_gain, after[0].avg_percent_gain);
        assert_eq!(
            before[0].cumulative_profit_loss,
            after[0].cumulative_profit_loss
        );
        assert_eq!(before[0].win_count, after[0].win_count);
        assert_eq!(before[0].loss_count, after[0].loss_count);
    }
}
