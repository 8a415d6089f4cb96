//! Core data types used across the trade ledger

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Records per page when rendering closed-trade history.
pub const HISTORY_PAGE_SIZE: usize = 15;

/// Maximum number of owners shown on the leaderboard.
pub const LEADERBOARD_LIMIT: usize = 10;

// ============================================================================
// Money Type - Precise Decimal Arithmetic for Monetary Values
// ============================================================================

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Money type for precise decimal arithmetic in monetary calculations.
///
/// Wraps `rust_decimal::Decimal` so that P/L sums and percent-gain
/// aggregates never drift the way f64 accumulation does. Used for all
/// prices, profit/loss values, and percentage figures in the ledger.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Money {
    /// Zero value
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// One hundred - the entry-price ceiling and the percent scale factor
    pub const ONE_HUNDRED: Money = Money(Decimal::ONE_HUNDRED);

    /// Create from i64 (for whole number values such as quantities)
    pub fn from_i64(value: i64) -> Self {
        Money(Decimal::from(value))
    }

    /// Check if value is zero
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Check if value is negative
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Round to specified decimal places (display only)
    pub fn round_dp(self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul for Money {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Money(self.0 * rhs.0)
    }
}

impl Div for Money {
    type Output = Self;
    fn div(self, rhs: Self) -> Self::Output {
        if rhs.0.is_zero() {
            Money::ZERO
        } else {
            Money(self.0 / rhs.0)
        }
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

// ============================================================================
// Identifiers
// ============================================================================

/// Length of the counter shortcut token (`"007"` for `alice-007`).
pub const SUFFIX_LEN: usize = 3;

/// Trade identifier, formatted `{owner}-{counter:03}`.
///
/// The counter is zero-padded to at least three digits and simply widens
/// past 999. Identifiers are user-typed in chat, so matching normalizes
/// typographic dash variants first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(String);

impl TradeId {
    /// Build the canonical identifier for an owner's nth trade.
    pub fn new(owner: &str, counter: u64) -> Self {
        TradeId(format!("{}-{:03}", owner, counter))
    }

    /// Wrap a user-supplied token, normalizing en/em dashes to hyphens.
    pub fn from_token(token: &str) -> Self {
        TradeId(normalize_dashes(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the full identifier ends with the given counter suffix.
    pub fn matches_suffix(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Replace typographic dash variants with a plain hyphen.
///
/// Chat clients autocorrect `-` into en/em dashes; both identifiers and
/// expiry dates arrive user-typed.
pub fn normalize_dashes(s: &str) -> String {
    s.replace('\u{2013}', "-").replace('\u{2014}', "-")
}

/// True when a token looks like a counter shortcut rather than a full id.
pub fn is_suffix_token(token: &str) -> bool {
    token.chars().count() == SUFFIX_LEN
}

// ============================================================================
// Trade Records
// ============================================================================

/// Trade lifecycle state. `Closed` is terminal; the only way out is deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "open",
            TradeStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(TradeStatus::Open),
            "closed" => Some(TradeStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One simulated options position, open through close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: TradeId,
    pub owner: String,
    pub ticker: String,
    /// Strike price and option type combined, e.g. "150C". Free-form.
    pub strike_descriptor: String,
    pub expiry: NaiveDate,
    pub entry_price: Money,
    pub quantity: u32,
    pub status: TradeStatus,
    pub opened_at: DateTime<Utc>,
    pub exit_price: Option<Money>,
    pub closed_at: Option<DateTime<Utc>>,
    pub profit_loss: Option<Money>,
    pub percent_gain: Option<Money>,
    /// Cosmetic annotation on closed trades. No effect on statistics.
    #[serde(default)]
    pub paper_hands_tagged: bool,
}

impl TradeRecord {
    /// A record is closed iff all four close-time fields are present.
    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
            && self.exit_price.is_some()
            && self.closed_at.is_some()
            && self.profit_loss.is_some()
            && self.percent_gain.is_some()
    }
}

/// Compute `(exit - entry) * quantity`.
pub fn profit_loss(entry_price: Money, exit_price: Money, quantity: u32) -> Money {
    (exit_price - entry_price) * Money::from_i64(quantity as i64)
}

/// Compute `(exit - entry) / entry * 100`.
pub fn percent_gain(entry_price: Money, exit_price: Money) -> Money {
    (exit_price - entry_price) / entry_price * Money::ONE_HUNDRED
}

// ============================================================================
// Validation helpers (bounds shared by open and edit)
// ============================================================================

/// Entry price must be in (0, 100] per share.
pub fn validate_entry_price(price: Money) -> Result<(), LedgerError> {
    if price <= Money::ZERO || price > Money::ONE_HUNDRED {
        return Err(LedgerError::Validation(format!(
            "entry price must be in (0, 100] per share, got {}",
            price
        )));
    }
    Ok(())
}

/// Quantity must be a positive integer.
pub fn validate_quantity(quantity: u32) -> Result<(), LedgerError> {
    if quantity == 0 {
        return Err(LedgerError::Validation(
            "quantity must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

/// Exit price must be strictly positive.
pub fn validate_exit_price(price: Money) -> Result<(), LedgerError> {
    if price <= Money::ZERO {
        return Err(LedgerError::Validation(format!(
            "exit price must be positive, got {}",
            price
        )));
    }
    Ok(())
}

/// Parse a user-typed expiry date (YYYY-MM-DD), tolerating typographic dashes.
pub fn parse_expiry(s: &str) -> Result<NaiveDate, LedgerError> {
    let normalized = normalize_dashes(s);
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .map_err(|_| LedgerError::Validation(format!("expiry must be YYYY-MM-DD, got '{}'", s)))
}

// ============================================================================
// Edits
// ============================================================================

/// A single-field update to an open trade.
///
/// Only these four fields are editable, and only while the trade is open
/// with an expiry strictly in the future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeEdit {
    EntryPrice(Money),
    Quantity(u32),
    StrikeDescriptor(String),
    Expiry(NaiveDate),
}

impl TradeEdit {
    /// Parse a field-name/value pair into a typed edit, applying the same
    /// bounds as open-time validation.
    pub fn parse(field: &str, value: &str) -> Result<Self, LedgerError> {
        match field {
            "entry_price" => {
                let price: Money = value.parse().map_err(|_| {
                    LedgerError::Validation(format!(
                        "entry price must be a number, got '{}'",
                        value
                    ))
                })?;
                validate_entry_price(price)?;
                Ok(TradeEdit::EntryPrice(price))
            }
            "quantity" => {
                let quantity: u32 = value.parse().map_err(|_| {
                    LedgerError::Validation(format!(
                        "quantity must be a positive integer, got '{}'",
                        value
                    ))
                })?;
                validate_quantity(quantity)?;
                Ok(TradeEdit::Quantity(quantity))
            }
            "strike_descriptor" => Ok(TradeEdit::StrikeDescriptor(value.to_uppercase())),
            "expiry" => Ok(TradeEdit::Expiry(parse_expiry(value)?)),
            other => Err(LedgerError::Validation(format!(
                "'{}' is not editable; allowed fields: entry_price, quantity, strike_descriptor, expiry",
                other
            ))),
        }
    }
}

// ============================================================================
// User Statistics
// ============================================================================

/// Per-owner running aggregates, updated incrementally on every close,
/// purge reversal, and expiry sweep. Never recomputed by full scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub owner: String,
    pub cumulative_profit_loss: Money,
    /// Sum of per-trade percent gains (not an average).
    pub cumulative_percent_gain: Money,
    pub closed_count: u32,
    pub win_count: u32,
    pub loss_count: u32,
    /// Monotonic trade-id counter, starts at 0.
    pub id_counter: u64,
}

impl UserStats {
    pub fn new(owner: &str) -> Self {
        UserStats {
            owner: owner.to_string(),
            cumulative_profit_loss: Money::ZERO,
            cumulative_percent_gain: Money::ZERO,
            closed_count: 0,
            win_count: 0,
            loss_count: 0,
            id_counter: 0,
        }
    }

    /// Average percent gain across closed trades; zero-trade owners report 0.
    pub fn avg_percent_gain(&self) -> Money {
        self.cumulative_percent_gain / Money::from_i64(self.closed_count.max(1) as i64)
    }
}

/// One leaderboard row, ranked by average percent gain.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub owner: String,
    pub avg_percent_gain: Money,
    pub cumulative_profit_loss: Money,
    pub win_count: u32,
    pub loss_count: u32,
}
