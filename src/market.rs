//! Market engine.
//!
//! Owns the instrument roster and the daily price process. Each simulated
//! day every instrument's trend bias absorbs pending sector news, the
//! active market-wide event (if any), an overcorrection snap, and random
//! noise, then moves the price. Instruments that close at or below the
//! low-price threshold for enough consecutive days are delisted and
//! replaced with a fresh listing.

use rand::Rng;
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info};

use crate::types::{
    GlobalEvent, Industry, Instrument, MarketBulletin, NewsTone, SectorEffect, TREND_LIMIT,
};

// ---------------------------------------------------------------------------
// Roster seeds
// ---------------------------------------------------------------------------

/// Starting roster: name, industry, listing price range (inclusive).
const SEED_COMPANIES: &[(&str, Industry, i64, i64)] = &[
    ("Aoh Electronics", Industry::Electronics, 20_000, 40_000),
    ("HO Group", Industry::Finance, 25_000, 35_000),
    ("Dongbang Pharma", Industry::Pharmaceuticals, 15_000, 35_000),
    ("SM Hynix", Industry::Semiconductors, 20_000, 30_000),
    ("Koryo Shipbuilding", Industry::Shipbuilding, 18_000, 28_000),
    ("CCH", Industry::Chemicals, 15_000, 25_000),
    ("Big Brother", Industry::Software, 22_000, 32_000),
    ("Solar Prime", Industry::Energy, 12_000, 22_000),
];

/// Names handed out to replacement listings, in order. Once exhausted,
/// replacements fall back to a numbered startup name.
const REPLACEMENT_NAMES: &[&str] = &[
    "NewTek",
    "Vision Solutions",
    "Stark Industries",
    "Global Partners",
    "Innovate Inc",
    "TechStar",
    "Juhyuk Company",
    "Dongsu Group",
    "Hansol Hi",
    "Microhard",
    "Angalix",
    "RobotRox",
];

/// Listing price range for replacement instruments (inclusive).
const REPLACEMENT_PRICE_RANGE: (i64, i64) = (5_000, 20_000);

/// Trend snaps to the opposite side once it runs past the limit.
const OVERCORRECTION: i64 = 300;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The simulated market: the instrument roster plus the active
/// market-wide event. Iteration order over instruments is by name.
#[derive(Debug, Clone)]
pub struct MarketEngine {
    instruments: BTreeMap<String, Instrument>,
    global_event: Option<GlobalEvent>,
    name_pool: VecDeque<String>,
}

impl MarketEngine {
    /// Build the starting market. Each seed company lists at a uniform
    /// random price in its range with a small random trend bias.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut instruments = BTreeMap::new();
        for &(name, industry, low, high) in SEED_COMPANIES {
            let price = rng.gen_range(low..=high);
            let trend = rng.gen_range(-50..=50);
            instruments.insert(name.to_string(), Instrument::new(name, industry, price, trend));
        }
        info!(instruments = instruments.len(), "Market opened");
        MarketEngine {
            instruments,
            global_event: None,
            name_pool: REPLACEMENT_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    // -- Accessors --

    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.values()
    }

    pub fn instrument(&self, name: &str) -> Option<&Instrument> {
        self.instruments.get(name)
    }

    pub fn current_price(&self, name: &str) -> Option<i64> {
        self.instruments.get(name).map(|inst| inst.price)
    }

    pub fn has_global_event(&self) -> bool {
        self.global_event.is_some()
    }

    pub fn global_event(&self) -> Option<&GlobalEvent> {
        self.global_event.as_ref()
    }

    // -- News hooks --

    /// Queue sector news against every instrument in the industry. The
    /// effect starts after a fixed delay and feeds the trend for a fixed
    /// number of days. Newer news overwrites any pending effect.
    pub fn apply_sector_news(&mut self, industry: Industry, tone: NewsTone) {
        for inst in self.instruments.values_mut() {
            if inst.industry == industry {
                inst.news = SectorEffect {
                    delay: 3,
                    sign: tone.sign(),
                    duration: 5,
                };
            }
        }
    }

    /// Start a market-wide event. The caller must not start one while
    /// another is active; the scheduler suppresses global draws until the
    /// current event expires.
    pub fn start_global_event(&mut self, tone: NewsTone, duration: u32, magnitude: i64) {
        let intensity = magnitude * tone.sign() as i64;
        info!(%tone, duration, intensity, "Market-wide event started");
        self.global_event = Some(GlobalEvent {
            sign: tone.sign(),
            remaining: duration,
            intensity,
        });
    }

    // -- Daily advance --

    /// Advance every instrument by one day and report listing changes.
    pub fn advance_one_day(&mut self, rng: &mut impl Rng) -> Vec<MarketBulletin> {
        // The event clock ticks once per day, not once per instrument.
        let global_intensity = match self.global_event.as_mut() {
            Some(event) => {
                let intensity = event.intensity;
                event.remaining -= 1;
                if event.remaining == 0 {
                    info!("Market-wide event expired");
                    self.global_event = None;
                }
                Some(intensity)
            }
            None => None,
        };

        let mut delisted = Vec::new();

        for inst in self.instruments.values_mut() {
            // Sector news: wait out the delay, then feed the trend.
            if inst.news.delay > 0 {
                inst.news.delay -= 1;
            } else if inst.news.duration > 0 {
                inst.trend += inst.news.sign as i64 * rng.gen_range(100..=300);
                inst.news.duration -= 1;
                if inst.news.duration == 0 {
                    inst.news.sign = 0;
                }
            }

            // Market-wide event, dampened per instrument.
            if let Some(intensity) = global_intensity {
                let dampening: f64 = rng.gen_range(0.7..=1.3);
                inst.trend += (intensity as f64 * dampening).round() as i64;
            }

            // Overcorrection: a runaway trend snaps to the opposite side.
            if inst.trend > TREND_LIMIT {
                inst.trend = -OVERCORRECTION;
            } else if inst.trend < -TREND_LIMIT {
                inst.trend = OVERCORRECTION;
            }

            // Random walk noise, then clamp.
            inst.trend += rng.gen_range(-50..=50);
            inst.trend = inst.trend.clamp(-TREND_LIMIT, TREND_LIMIT);

            let next = inst.price + inst.trend;
            inst.apply_price(next);

            if inst.is_delistable() {
                delisted.push(inst.name.clone());
            } else {
                inst.push_history();
            }
        }

        let mut bulletins = Vec::new();
        for name in delisted {
            self.instruments.remove(&name);
            info!(instrument = %name, "Instrument delisted");
            bulletins.push(MarketBulletin::Delisted { name });
            bulletins.push(self.replace_delisted(rng));
        }
        bulletins
    }

    /// List a replacement instrument: pooled name (or numbered fallback),
    /// random industry, fresh listing price, neutral trend.
    fn replace_delisted(&mut self, rng: &mut impl Rng) -> MarketBulletin {
        let name = match self.name_pool.pop_front() {
            Some(name) => name,
            // Fallback names are drawn from a small numbered space, so a
            // draw may land on a name that is still listed. Redraw until
            // it is free; the roster is far smaller than the name space.
            None => loop {
                let candidate = format!("Startup {}", rng.gen_range(1..=100));
                if !self.instruments.contains_key(&candidate) {
                    break candidate;
                }
            },
        };
        let industry = Industry::ALL[rng.gen_range(0..Industry::ALL.len())];
        let (low, high) = REPLACEMENT_PRICE_RANGE;
        let price = rng.gen_range(low..=high);
        debug!(instrument = %name, %industry, price, "Instrument listed");
        self.instruments
            .insert(name.clone(), Instrument::new(name.clone(), industry, price, 0));
        MarketBulletin::Listed { name, industry }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
