//! Portfolio ledger.
//!
//! Tracks the cash balance and per-instrument holdings. Each purchased
//! share is recorded as an individual lot at its purchase price; sales
//! consume lots first-in first-out, and the unrealized profit figure is
//! measured against the average cost of the lots still held.

use std::collections::{BTreeMap, VecDeque};
use tracing::{info, warn};

use crate::types::{GameStatus, TradeError};

/// Holdings in one instrument: the share count plus one cost-basis entry
/// per share, in purchase order.
#[derive(Debug, Clone, Default)]
pub struct Position {
    quantity: i64,
    lots: VecDeque<i64>,
}

impl Position {
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Average purchase price of the shares still held.
    pub fn average_cost(&self) -> Option<f64> {
        if self.lots.is_empty() {
            return None;
        }
        Some(self.lots.iter().sum::<i64>() as f64 / self.lots.len() as f64)
    }
}

/// Cash balance plus all open positions, keyed by instrument name.
#[derive(Debug, Clone)]
pub struct PortfolioLedger {
    balance: i64,
    positions: BTreeMap<String, Position>,
}

impl PortfolioLedger {
    pub fn new(initial_balance: i64) -> Self {
        PortfolioLedger {
            balance: initial_balance,
            positions: BTreeMap::new(),
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Shares held in the named instrument.
    pub fn owned(&self, name: &str) -> i64 {
        self.positions.get(name).map_or(0, |p| p.quantity)
    }

    /// Buy shares at the given price. Validates before mutating: a rejected
    /// trade leaves the ledger untouched. Returns the total cost.
    pub fn buy(&mut self, name: &str, price: i64, quantity: i64) -> Result<i64, TradeError> {
        if quantity <= 0 {
            return Err(TradeError::InvalidQuantity);
        }
        // An order too large for i64 cannot be affordable either.
        let cost = price
            .checked_mul(quantity)
            .ok_or(TradeError::InsufficientFunds {
                needed: i64::MAX,
                available: self.balance,
            })?;
        if cost > self.balance {
            return Err(TradeError::InsufficientFunds {
                needed: cost,
                available: self.balance,
            });
        }
        self.balance -= cost;
        let position = self.positions.entry(name.to_string()).or_default();
        position.quantity += quantity;
        for _ in 0..quantity {
            position.lots.push_back(price);
        }
        info!(instrument = name, quantity, price, cost, balance = self.balance, "Buy filled");
        Ok(cost)
    }

    /// Sell shares at the given price, consuming the oldest lots first.
    /// Returns the total proceeds.
    pub fn sell(&mut self, name: &str, price: i64, quantity: i64) -> Result<i64, TradeError> {
        if quantity <= 0 {
            return Err(TradeError::InvalidQuantity);
        }
        let owned = self.owned(name);
        if quantity > owned {
            return Err(TradeError::InsufficientHoldings {
                requested: quantity,
                owned,
            });
        }
        let position = self
            .positions
            .get_mut(name)
            .ok_or_else(|| TradeError::InsufficientHoldings { requested: quantity, owned: 0 })?;
        for _ in 0..quantity {
            position.lots.pop_front();
        }
        position.quantity -= quantity;
        if position.quantity == 0 {
            self.positions.remove(name);
        }
        let proceeds = price * quantity;
        self.balance += proceeds;
        info!(instrument = name, quantity, price, proceeds, balance = self.balance, "Sell filled");
        Ok(proceeds)
    }

    /// Deduct the daily living expense. The balance may go negative, which
    /// ends the game.
    pub fn charge_daily_expense(&mut self, expense: i64) -> GameStatus {
        self.balance -= expense;
        if self.balance < 0 {
            warn!(balance = self.balance, "Balance went negative after daily expense");
            GameStatus::Bankrupt
        } else {
            GameStatus::Running
        }
    }

    /// Unrealized profit versus the average cost of the held lots, as a
    /// percentage. None when nothing is held.
    pub fn profit_pct(&self, name: &str, current_price: i64) -> Option<f64> {
        let avg = self.positions.get(name)?.average_cost()?;
        Some((current_price as f64 - avg) / avg * 100.0)
    }

    /// Drop the position in a delisted instrument. Shares are forfeited
    /// with no compensation.
    pub fn forfeit(&mut self, name: &str) {
        if let Some(position) = self.positions.remove(name) {
            warn!(instrument = name, quantity = position.quantity, "Holdings forfeited on delisting");
        }
    }

    /// Names of all instruments currently held.
    pub fn held_names(&self) -> impl Iterator<Item = &str> {
        self.positions.keys().map(|s| s.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
