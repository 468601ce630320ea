//! Simulation orchestrator.
//!
//! Owns the market engine, the news scheduler, the portfolio ledger, and
//! the single RNG, and sequences one simulated day per tick:
//! charge the daily expense (bankruptcy ends the game before the market
//! moves), advance prices, forfeit holdings in delisted instruments, then
//! run the news schedule. Trades and view queries arrive between ticks.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::fmt;
use tracing::info;

use crate::config::AppConfig;
use crate::ledger::PortfolioLedger;
use crate::market::MarketEngine;
use crate::news::NewsCatalog;
use crate::scheduler::EventScheduler;
use crate::types::{
    GameStatus, MarketBulletin, NewsFlash, PriceSeries, TableRow, TradeError, TradeReceipt,
    TradeSide,
};

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// Everything that happened during one simulated day.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub day: u64,
    pub timestamp: DateTime<Utc>,
    pub status: GameStatus,
    pub balance: i64,
    pub bulletins: Vec<MarketBulletin>,
    pub news: Vec<NewsFlash>,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Day {} [{}] balance {} ({} bulletins, {} headlines)",
            self.day,
            self.status,
            crate::types::group_digits(self.balance),
            self.bulletins.len(),
            self.news.len(),
        )
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

pub struct Simulation {
    engine: MarketEngine,
    scheduler: EventScheduler,
    ledger: PortfolioLedger,
    catalog: NewsCatalog,
    rng: StdRng,
    day: u64,
    status: GameStatus,
    daily_expense: i64,
    chart_selection: BTreeSet<String>,
}

impl Simulation {
    pub fn new(config: &AppConfig, catalog: NewsCatalog) -> Self {
        let mut rng = match config.game.rng_seed {
            Some(seed) => {
                info!(seed, "Using fixed RNG seed");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        let engine = MarketEngine::new(&mut rng);
        let scheduler = EventScheduler::new(&mut rng);
        Simulation {
            engine,
            scheduler,
            ledger: PortfolioLedger::new(config.game.initial_balance),
            catalog,
            rng,
            day: 0,
            status: GameStatus::Running,
            daily_expense: config.game.daily_expense,
            chart_selection: BTreeSet::new(),
        }
    }

    pub fn day(&self) -> u64 {
        self.day
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn balance(&self) -> i64 {
        self.ledger.balance()
    }

    // -- Daily tick --

    /// Advance one simulated day. After bankruptcy this is a no-op that
    /// keeps reporting the terminal state.
    pub fn tick(&mut self) -> TickReport {
        if self.status != GameStatus::Running {
            return self.report(Vec::new(), Vec::new());
        }

        self.day += 1;

        // The expense lands before the market moves. A negative balance is
        // terminal and freezes prices where they were.
        if self.ledger.charge_daily_expense(self.daily_expense) == GameStatus::Bankrupt {
            self.status = GameStatus::Bankrupt;
            info!(day = self.day, balance = self.ledger.balance(), "Game over");
            return self.report(Vec::new(), Vec::new());
        }

        let bulletins = self.engine.advance_one_day(&mut self.rng);
        for bulletin in &bulletins {
            match bulletin {
                MarketBulletin::Delisted { name } => {
                    self.ledger.forfeit(name);
                    self.chart_selection.remove(name);
                }
                MarketBulletin::Listed { .. } => {}
            }
        }

        let news = self.scheduler.tick(&mut self.engine, &self.catalog, &mut self.rng);
        self.report(bulletins, news)
    }

    fn report(&self, bulletins: Vec<MarketBulletin>, news: Vec<NewsFlash>) -> TickReport {
        TickReport {
            day: self.day,
            timestamp: Utc::now(),
            status: self.status,
            balance: self.ledger.balance(),
            bulletins,
            news,
        }
    }

    // -- Trading --

    /// Buy shares at the current price.
    pub fn buy(&mut self, name: &str, quantity: i64) -> Result<TradeReceipt, TradeError> {
        let price = self
            .engine
            .current_price(name)
            .ok_or_else(|| TradeError::UnknownInstrument(name.to_string()))?;
        let total = self.ledger.buy(name, price, quantity)?;
        Ok(TradeReceipt {
            side: TradeSide::Buy,
            name: name.to_string(),
            quantity,
            price,
            total,
        })
    }

    /// Sell shares at the current price.
    pub fn sell(&mut self, name: &str, quantity: i64) -> Result<TradeReceipt, TradeError> {
        let price = self
            .engine
            .current_price(name)
            .ok_or_else(|| TradeError::UnknownInstrument(name.to_string()))?;
        let total = self.ledger.sell(name, price, quantity)?;
        Ok(TradeReceipt {
            side: TradeSide::Sell,
            name: name.to_string(),
            quantity,
            price,
            total,
        })
    }

    // -- Views --

    /// Instrument table rows, highest price first, ties broken by name.
    pub fn table_rows(&self) -> Vec<TableRow> {
        let mut rows: Vec<TableRow> = self
            .engine
            .instruments()
            .map(|inst| TableRow {
                name: inst.name.clone(),
                industry: inst.industry,
                price: inst.price,
                owned: self.ledger.owned(&inst.name),
                profit_pct: self.ledger.profit_pct(&inst.name, inst.price),
            })
            .collect();
        rows.sort_by(|a, b| b.price.cmp(&a.price).then_with(|| a.name.cmp(&b.name)));
        rows
    }

    /// Replace the chart selection. Every name must be currently listed.
    pub fn select_chart_instruments(&mut self, names: &[String]) -> Result<(), TradeError> {
        for name in names {
            if self.engine.instrument(name).is_none() {
                return Err(TradeError::UnknownInstrument(name.clone()));
            }
        }
        self.chart_selection = names.iter().cloned().collect();
        Ok(())
    }

    /// Price histories for the charted instruments, oldest close first.
    pub fn chart_series(&self) -> Vec<PriceSeries> {
        self.chart_selection
            .iter()
            .filter_map(|name| self.engine.instrument(name))
            .map(|inst| PriceSeries {
                name: inst.name.clone(),
                prices: inst.history.iter().copied().collect(),
            })
            .collect()
    }

    pub fn chart_selection(&self) -> impl Iterator<Item = &str> {
        self.chart_selection.iter().map(|s| s.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
