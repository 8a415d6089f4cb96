//! Statistics aggregator and identifier allocator
//!
//! Maintains per-owner running totals (cumulative P/L, cumulative percent,
//! closed/win/loss counts) updated incrementally on every close, purge
//! reversal, and expiry event. Leaderboard ranking is the only full scan.
//! The same user record carries the monotonic trade-id counter.

use anyhow::Result;
use tracing::debug;

use crate::store::LedgerStore;
use crate::types::{LeaderboardEntry, Money, TradeId, UserStats};

fn load_or_new(store: &dyn LedgerStore, owner: &str) -> Result<UserStats> {
    Ok(store
        .get_stats(owner)?
        .unwrap_or_else(|| UserStats::new(owner)))
}

/// Allocate the owner's next trade identifier.
///
/// Increments and persists the per-owner counter, then formats
/// `{owner}-{counter:03}`. Called exactly once per successful open; if the
/// subsequent record insert fails the counter is not rolled back, accepting
/// a rare identifier gap over gapless sequencing machinery.
pub fn allocate_id(store: &dyn LedgerStore, owner: &str) -> Result<TradeId> {
    let mut stats = load_or_new(store, owner)?;
    stats.id_counter += 1;
    store.upsert_stats(&stats)?;

    let id = TradeId::new(owner, stats.id_counter);
    debug!("Allocated trade id {}", id);
    Ok(id)
}

/// Fold one closed trade into the owner's aggregates.
///
/// A break-even close (`profit_loss == 0`) counts as a win.
pub fn record_close(
    store: &dyn LedgerStore,
    owner: &str,
    profit_loss: Money,
    percent_gain: Money,
) -> Result<()> {
    let mut stats = load_or_new(store, owner)?;
    stats.cumulative_profit_loss += profit_loss;
    stats.cumulative_percent_gain += percent_gain;
    stats.closed_count += 1;
    if profit_loss.is_negative() {
        stats.loss_count += 1;
    } else {
        stats.win_count += 1;
    }
    store.upsert_stats(&stats)
}

/// Exact inverse of [`record_close`], used when a closed trade is purged.
///
/// Counts floor at zero to tolerate data drift rather than going negative.
pub fn reverse_close(
    store: &dyn LedgerStore,
    owner: &str,
    profit_loss: Money,
    percent_gain: Money,
) -> Result<()> {
    let mut stats = load_or_new(store, owner)?;
    stats.cumulative_profit_loss -= profit_loss;
    stats.cumulative_percent_gain -= percent_gain;
    stats.closed_count = stats.closed_count.saturating_sub(1);
    if profit_loss.is_negative() {
        stats.loss_count = stats.loss_count.saturating_sub(1);
    } else {
        stats.win_count = stats.win_count.saturating_sub(1);
    }
    store.upsert_stats(&stats)
}

/// All owners ranked descending by average percent gain.
///
/// Owners with no closed trades sink to the bottom; ties keep store
/// iteration order (the sort is stable).
pub fn rank(store: &dyn LedgerStore) -> Result<Vec<LeaderboardEntry>> {
    let mut all = store.all_stats()?;
    all.sort_by(|a, b| {
        let key = |s: &UserStats| (s.closed_count > 0).then(|| s.avg_percent_gain());
        key(b).cmp(&key(a))
    });

    Ok(all
        .into_iter()
        .map(|s| LeaderboardEntry {
            avg_percent_gain: s.avg_percent_gain(),
            cumulative_profit_loss: s.cumulative_profit_loss,
            win_count: s.win_count,
            loss_count: s.loss_count,
            owner: s.owner,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteLedgerStore;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn test_allocate_id_increments_counter() {
        let store = SqliteLedgerStore::open_in_memory().unwrap();
        assert_eq!(allocate_id(&store, "alice").unwrap().as_str(), "alice-001");
        assert_eq!(allocate_id(&store, "alice").unwrap().as_str(), "alice-002");
        // independent counter per owner
        assert_eq!(allocate_id(&store, "bob").unwrap().as_str(), "bob-001");
        assert_eq!(store.get_stats("alice").unwrap().unwrap().id_counter, 2);
    }

    #[test]
    fn test_record_close_win_loss_split() {
        let store = SqliteLedgerStore::open_in_memory().unwrap();
        record_close(&store, "alice", money("1.60"), money("100")).unwrap();
        record_close(&store, "alice", money("-0.40"), money("-50")).unwrap();
        // break-even counts as a win
        record_close(&store, "alice", money("0"), money("0")).unwrap();

        let stats = store.get_stats("alice").unwrap().unwrap();
        assert_eq!(stats.closed_count, 3);
        assert_eq!(stats.win_count, 2);
        assert_eq!(stats.loss_count, 1);
        assert_eq!(stats.win_count + stats.loss_count, stats.closed_count);
        assert_eq!(stats.cumulative_profit_loss, money("1.20"));
        assert_eq!(stats.cumulative_percent_gain, money("50"));
    }

    #[test]
    fn test_reverse_close_is_exact_inverse() {
        let store = SqliteLedgerStore::open_in_memory().unwrap();
        record_close(&store, "alice", money("1.60"), money("100")).unwrap();
        let before = store.get_stats("alice").unwrap().unwrap();

        record_close(&store, "alice", money("-0.40"), money("-50")).unwrap();
        reverse_close(&store, "alice", money("-0.40"), money("-50")).unwrap();

        let after = store.get_stats("alice").unwrap().unwrap();
        assert_eq!(after.cumulative_profit_loss, before.cumulative_profit_loss);
        assert_eq!(
            after.cumulative_percent_gain,
            before.cumulative_percent_gain
        );
        assert_eq!(after.closed_count, before.closed_count);
        assert_eq!(after.win_count, before.win_count);
        assert_eq!(after.loss_count, before.loss_count);
    }

    #[test]
    fn test_reverse_close_floors_at_zero() {
        let store = SqliteLedgerStore::open_in_memory().unwrap();
        // drifted data: reversal with no prior close must not underflow
        reverse_close(&store, "alice", money("1"), money("10")).unwrap();

        let stats = store.get_stats("alice").unwrap().unwrap();
        assert_eq!(stats.closed_count, 0);
        assert_eq!(stats.win_count, 0);
        assert_eq!(stats.cumulative_profit_loss, money("-1"));
    }

    #[test]
    fn test_rank_orders_by_average_percent() {
        let store = SqliteLedgerStore::open_in_memory().unwrap();
        // u1: one trade at +10%, u2: one trade at +25%
        record_close(&store, "u1", money("0.10"), money("10")).unwrap();
        record_close(&store, "u2", money("0.25"), money("25")).unwrap();

        let ranked = rank(&store).unwrap();
        assert_eq!(ranked[0].owner, "u2");
        assert_eq!(ranked[1].owner, "u1");
        assert_eq!(ranked[0].avg_percent_gain, money("25"));
    }

    #[test]
    fn test_rank_average_not_sum() {
        let store = SqliteLedgerStore::open_in_memory().unwrap();
        // u1 sums to +30% over two trades (avg 15), u2 has one trade at +20%
        record_close(&store, "u1", money("0.10"), money("10")).unwrap();
        record_close(&store, "u1", money("0.20"), money("20")).unwrap();
        record_close(&store, "u2", money("0.20"), money("20")).unwrap();

        let ranked = rank(&store).unwrap();
        assert_eq!(ranked[0].owner, "u2");
        assert_eq!(ranked[1].avg_percent_gain, money("15"));
    }

    #[test]
    fn test_rank_sinks_owners_without_closes() {
        let store = SqliteLedgerStore::open_in_memory().unwrap();
        // bob only ever opened trades (counter allocated, nothing closed)
        allocate_id(&store, "bob").unwrap();
        record_close(&store, "alice", money("-0.40"), money("-50")).unwrap();

        let ranked = rank(&store).unwrap();
        assert_eq!(ranked[0].owner, "alice");
        assert_eq!(ranked[1].owner, "bob");
    }
}
