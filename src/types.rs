//! Shared types for the BOURSE simulation.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that the market engine, scheduler,
//! ledger, and frontend modules can depend on them without circular
//! references.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ---------------------------------------------------------------------------
// Market constants
// ---------------------------------------------------------------------------

/// Hard price floor — no instrument ever trades below this.
pub const PRICE_FLOOR: i64 = 100;

/// Number of daily closes kept per instrument.
pub const HISTORY_DAYS: usize = 100;

/// Trend bias is clamped to [-TREND_LIMIT, TREND_LIMIT] each day.
pub const TREND_LIMIT: i64 = 500;

/// A close at or below this price counts toward the delisting streak.
pub const LOW_PRICE_THRESHOLD: i64 = 1000;

/// Consecutive low-price days that trigger delisting.
pub const DELISTING_STREAK: u32 = 5;

// ---------------------------------------------------------------------------
// Industry
// ---------------------------------------------------------------------------

/// Industry tag for sector news routing. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Industry {
    Electronics,
    Automotive,
    Pharmaceuticals,
    Semiconductors,
    Shipbuilding,
    Chemicals,
    Energy,
    Retail,
    Finance,
    Software,
}

impl Industry {
    /// All known industries (useful for iteration and random draws).
    pub const ALL: &'static [Industry] = &[
        Industry::Electronics,
        Industry::Automotive,
        Industry::Pharmaceuticals,
        Industry::Semiconductors,
        Industry::Shipbuilding,
        Industry::Chemicals,
        Industry::Energy,
        Industry::Retail,
        Industry::Finance,
        Industry::Software,
    ];
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Industry::Electronics => write!(f, "Electronics"),
            Industry::Automotive => write!(f, "Automotive"),
            Industry::Pharmaceuticals => write!(f, "Pharmaceuticals"),
            Industry::Semiconductors => write!(f, "Semiconductors"),
            Industry::Shipbuilding => write!(f, "Shipbuilding"),
            Industry::Chemicals => write!(f, "Chemicals"),
            Industry::Energy => write!(f, "Energy"),
            Industry::Retail => write!(f, "Retail"),
            Industry::Finance => write!(f, "Finance"),
            Industry::Software => write!(f, "Software"),
        }
    }
}

/// Attempt to parse a string into an Industry (case-insensitive).
impl std::str::FromStr for Industry {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electronics" => Ok(Industry::Electronics),
            "automotive" | "auto" => Ok(Industry::Automotive),
            "pharmaceuticals" | "pharma" => Ok(Industry::Pharmaceuticals),
            "semiconductors" | "semiconductor" => Ok(Industry::Semiconductors),
            "shipbuilding" => Ok(Industry::Shipbuilding),
            "chemicals" | "chemical" => Ok(Industry::Chemicals),
            "energy" => Ok(Industry::Energy),
            "retail" => Ok(Industry::Retail),
            "finance" | "financial" => Ok(Industry::Finance),
            "software" | "it" => Ok(Industry::Software),
            _ => Err(anyhow::anyhow!("Unknown industry: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// News tone
// ---------------------------------------------------------------------------

/// Whether a piece of news is good or bad for the affected instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewsTone {
    Favorable,
    Unfavorable,
}

impl NewsTone {
    /// Effect sign applied to trend: +1 for favorable, -1 for unfavorable.
    pub fn sign(&self) -> i8 {
        match self {
            NewsTone::Favorable => 1,
            NewsTone::Unfavorable => -1,
        }
    }
}

impl fmt::Display for NewsTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsTone::Favorable => write!(f, "favorable"),
            NewsTone::Unfavorable => write!(f, "unfavorable"),
        }
    }
}

impl std::str::FromStr for NewsTone {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "favorable" | "good" => Ok(NewsTone::Favorable),
            "unfavorable" | "bad" => Ok(NewsTone::Unfavorable),
            _ => Err(anyhow::anyhow!("Unknown news tone: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Instrument
// ---------------------------------------------------------------------------

/// Pending sector-news influence on a single instrument.
///
/// News lands with a delay: `delay` days pass untouched, then the signed
/// effect feeds the trend for `duration` days, then the sign is cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectorEffect {
    /// Days until the effect starts applying.
    pub delay: u32,
    /// Effect direction: -1, 0, or +1.
    pub sign: i8,
    /// Days of effect remaining once the delay has elapsed.
    pub duration: u32,
}

impl SectorEffect {
    /// Whether no news influence is pending or active.
    pub fn is_idle(&self) -> bool {
        self.delay == 0 && self.duration == 0 && self.sign == 0
    }
}

/// A tradable simulated stock.
#[derive(Debug, Clone)]
pub struct Instrument {
    pub name: String,
    pub industry: Industry,
    /// Current price. Invariant: always >= PRICE_FLOOR.
    pub price: i64,
    /// Short-term momentum bias added to the price each day.
    pub trend: i64,
    /// Up to the last HISTORY_DAYS daily closes, oldest first.
    pub history: VecDeque<i64>,
    /// Consecutive days the close was <= LOW_PRICE_THRESHOLD.
    pub low_price_streak: u32,
    pub news: SectorEffect,
}

impl Instrument {
    /// A freshly listed instrument. History starts with the listing price.
    pub fn new(name: impl Into<String>, industry: Industry, price: i64, trend: i64) -> Self {
        let mut history = VecDeque::with_capacity(HISTORY_DAYS + 1);
        history.push_back(price);
        Instrument {
            name: name.into(),
            industry,
            price,
            trend,
            history,
            low_price_streak: 0,
            news: SectorEffect::default(),
        }
    }

    /// Set the new daily close and update the low-price streak.
    pub fn apply_price(&mut self, price: i64) {
        self.price = price.max(PRICE_FLOOR);
        if self.price <= LOW_PRICE_THRESHOLD {
            self.low_price_streak += 1;
        } else {
            self.low_price_streak = 0;
        }
    }

    /// Append the current price to the history, evicting the oldest close
    /// beyond HISTORY_DAYS.
    pub fn push_history(&mut self) {
        self.history.push_back(self.price);
        while self.history.len() > HISTORY_DAYS {
            self.history.pop_front();
        }
    }

    /// Whether this instrument has crossed the delisting threshold.
    pub fn is_delistable(&self) -> bool {
        self.low_price_streak >= DELISTING_STREAK
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} (trend {:+})",
            self.name,
            self.industry,
            group_digits(self.price),
            self.trend,
        )
    }
}

// ---------------------------------------------------------------------------
// Global event
// ---------------------------------------------------------------------------

/// A market-wide trend shock. At most one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalEvent {
    /// Effect direction: +1 or -1.
    pub sign: i8,
    /// Days remaining before the event expires.
    pub remaining: u32,
    /// Signed daily trend contribution (magnitude 200-500), dampened per
    /// instrument by a random factor in [0.7, 1.3].
    pub intensity: i64,
}

impl GlobalEvent {
    pub fn tone(&self) -> NewsTone {
        if self.sign >= 0 {
            NewsTone::Favorable
        } else {
            NewsTone::Unfavorable
        }
    }
}

impl fmt::Display for GlobalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} market event (intensity {:+}, {} days left)",
            self.tone(),
            self.intensity,
            self.remaining,
        )
    }
}

// ---------------------------------------------------------------------------
// Published events
// ---------------------------------------------------------------------------

/// A headline published for display when a news timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsFlash {
    /// Sector news affecting every instrument in one industry.
    Sector {
        industry: Industry,
        tone: NewsTone,
        headline: String,
    },
    /// Market-wide news affecting every instrument.
    Global { tone: NewsTone, headline: String },
}

impl fmt::Display for NewsFlash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsFlash::Sector { industry, headline, .. } => {
                write!(f, "News) {industry}: {headline}")
            }
            NewsFlash::Global { tone, headline } => {
                write!(f, "[Market-wide {tone}] {headline}")
            }
        }
    }
}

/// A listing change announced by the market engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketBulletin {
    Delisted { name: String },
    Listed { name: String, industry: Industry },
}

impl fmt::Display for MarketBulletin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketBulletin::Delisted { name } => write!(f, "{name} has been delisted!"),
            MarketBulletin::Listed { name, industry } => {
                write!(f, "{name} ({industry}) is newly listed!")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Presentation snapshots
// ---------------------------------------------------------------------------

/// One row of the instrument table shown to the player.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub name: String,
    pub industry: Industry,
    pub price: i64,
    pub owned: i64,
    /// Unrealized profit percentage; None when no shares are held.
    pub profit_pct: Option<f64>,
}

impl TableRow {
    /// Profit column content, with a placeholder when nothing is held.
    pub fn profit_cell(&self) -> String {
        match self.profit_pct {
            Some(pct) => format!("{pct:+.2}%"),
            None => "-".to_string(),
        }
    }
}

/// Price history for one instrument, for the chart view.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub name: String,
    pub prices: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Trade receipt
// ---------------------------------------------------------------------------

/// Which way a completed trade went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Receipt returned after a trade completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReceipt {
    pub side: TradeSide,
    pub name: String,
    pub quantity: i64,
    pub price: i64,
    /// Total cost (buy) or proceeds (sell).
    pub total: i64,
}

impl fmt::Display for TradeReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            TradeSide::Buy => write!(
                f,
                "Bought {} x {} @ {} (cost {})",
                self.quantity,
                self.name,
                group_digits(self.price),
                group_digits(self.total),
            ),
            TradeSide::Sell => write!(
                f,
                "Sold {} x {} @ {} (proceeds {})",
                self.quantity,
                self.name,
                group_digits(self.price),
                group_digits(self.total),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Game status
// ---------------------------------------------------------------------------

/// Simulation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// Balance went negative after the daily expense. Terminal.
    Bankrupt,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Running => write!(f, "RUNNING"),
            GameStatus::Bankrupt => write!(f, "BANKRUPT"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Trade validation errors. Every variant aborts the operation with no
/// partial state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradeError {
    #[error("Quantity must be a positive whole number")]
    InvalidQuantity,

    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("Insufficient holdings: requested {requested}, own {owned}")]
    InsufficientHoldings { requested: i64, owned: i64 },
}

/// Parse a user-entered quantity string. Non-numeric or non-positive input
/// maps to `TradeError::InvalidQuantity`.
pub fn parse_quantity(raw: &str) -> Result<i64, TradeError> {
    let quantity: i64 = raw.trim().parse().map_err(|_| TradeError::InvalidQuantity)?;
    if quantity <= 0 {
        return Err(TradeError::InvalidQuantity);
    }
    Ok(quantity)
}

/// Format an amount with thousands separators, e.g. 9970000 -> "9,970,000".
pub fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
