//! News event scheduler.
//!
//! Runs on the simulation's day clock rather than wall time: each tick
//! decrements two countdowns, one for sector news and one for market-wide
//! news. When a countdown reaches zero the scheduler draws a headline from
//! the catalog, applies it to the market engine, and redraws the countdown.
//! Market-wide firings are skipped while an event is already active.

use rand::Rng;
use tracing::{debug, warn};

use crate::market::MarketEngine;
use crate::news::NewsCatalog;
use crate::types::NewsFlash;

/// Days between sector news, inclusive.
const SECTOR_INTERVAL: (u32, u32) = (5, 10);

/// Days between market-wide news, inclusive.
const GLOBAL_INTERVAL: (u32, u32) = (30, 60);

/// Days a market-wide event runs, inclusive.
const GLOBAL_DURATION: (u32, u32) = (7, 10);

/// Daily trend magnitude of a market-wide event, inclusive.
const GLOBAL_MAGNITUDE: (i64, i64) = (200, 500);

/// Tick-counter schedule for sector and market-wide news.
#[derive(Debug, Clone)]
pub struct EventScheduler {
    sector_in: u32,
    global_in: u32,
}

impl EventScheduler {
    pub fn new(rng: &mut impl Rng) -> Self {
        EventScheduler {
            sector_in: rng.gen_range(SECTOR_INTERVAL.0..=SECTOR_INTERVAL.1),
            global_in: rng.gen_range(GLOBAL_INTERVAL.0..=GLOBAL_INTERVAL.1),
        }
    }

    /// Countdown until the next sector headline fires.
    pub fn sector_in(&self) -> u32 {
        self.sector_in
    }

    /// Countdown until the next market-wide headline fires.
    pub fn global_in(&self) -> u32 {
        self.global_in
    }

    /// Advance both countdowns by one day, firing whichever reach zero.
    /// Returns the headlines published this tick.
    pub fn tick(
        &mut self,
        engine: &mut MarketEngine,
        catalog: &NewsCatalog,
        rng: &mut impl Rng,
    ) -> Vec<NewsFlash> {
        let mut flashes = Vec::new();

        self.sector_in = self.sector_in.saturating_sub(1);
        if self.sector_in == 0 {
            match catalog.pick_sector(rng) {
                Some((industry, tone, headline)) => {
                    debug!(%industry, %tone, "Sector news fired");
                    engine.apply_sector_news(industry, tone);
                    flashes.push(NewsFlash::Sector {
                        industry,
                        tone,
                        headline: headline.to_string(),
                    });
                }
                None => warn!("No sector headline available, skipping this firing"),
            }
            self.sector_in = rng.gen_range(SECTOR_INTERVAL.0..=SECTOR_INTERVAL.1);
        }

        // The global countdown keeps running while an event is in flight;
        // a firing that lands mid-event is skipped so events never overlap.
        self.global_in = self.global_in.saturating_sub(1);
        if self.global_in == 0 {
            if engine.has_global_event() {
                debug!("Market-wide firing skipped, an event is already active");
            } else if let Some((tone, headline)) = catalog.pick_global(rng) {
                let duration = rng.gen_range(GLOBAL_DURATION.0..=GLOBAL_DURATION.1);
                let magnitude = rng.gen_range(GLOBAL_MAGNITUDE.0..=GLOBAL_MAGNITUDE.1);
                engine.start_global_event(tone, duration, magnitude);
                flashes.push(NewsFlash::Global {
                    tone,
                    headline: headline.to_string(),
                });
            }
            self.global_in = rng.gen_range(GLOBAL_INTERVAL.0..=GLOBAL_INTERVAL.1);
        }

        flashes
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixture(seed: u64) -> (EventScheduler, MarketEngine, NewsCatalog, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let engine = MarketEngine::new(&mut rng);
        let scheduler = EventScheduler::new(&mut rng);
        (scheduler, engine, NewsCatalog::synthesized(), rng)
    }

    #[test]
    fn test_initial_countdowns_in_range() {
        for seed in 0..50 {
            let (scheduler, _, _, _) = fixture(seed);
            assert!((5..=10).contains(&scheduler.sector_in()));
            assert!((30..=60).contains(&scheduler.global_in()));
        }
    }

    #[test]
    fn test_sector_news_fires_and_reschedules() {
        let (mut scheduler, mut engine, catalog, mut rng) = fixture(1);
        let wait = scheduler.sector_in();
        let mut fired = Vec::new();
        for _ in 0..wait {
            fired.extend(scheduler.tick(&mut engine, &catalog, &mut rng));
        }
        assert!(fired
            .iter()
            .any(|f| matches!(f, NewsFlash::Sector { .. })));
        assert!((5..=10).contains(&scheduler.sector_in()));
    }

    #[test]
    fn test_sector_news_lands_on_engine() {
        let (mut scheduler, mut engine, catalog, mut rng) = fixture(2);
        for _ in 0..scheduler.sector_in() {
            let flashes = scheduler.tick(&mut engine, &catalog, &mut rng);
            if let Some(NewsFlash::Sector { industry, .. }) = flashes.first() {
                // Instruments in the industry now carry a pending effect,
                // unless none are currently listed in it.
                for inst in engine.instruments() {
                    if inst.industry == *industry {
                        assert!(!inst.news.is_idle());
                    }
                }
                return;
            }
        }
        panic!("sector news never fired");
    }

    #[test]
    fn test_global_news_fires_eventually() {
        let (mut scheduler, mut engine, catalog, mut rng) = fixture(3);
        let mut fired = false;
        for _ in 0..61 {
            let flashes = scheduler.tick(&mut engine, &catalog, &mut rng);
            if flashes.iter().any(|f| matches!(f, NewsFlash::Global { .. })) {
                fired = true;
                break;
            }
        }
        assert!(fired);
        assert!(engine.has_global_event());
    }

    #[test]
    fn test_global_firing_skipped_while_event_active() {
        let (mut scheduler, mut engine, catalog, mut rng) = fixture(4);
        engine.start_global_event(crate::types::NewsTone::Favorable, 1000, 300);
        // The countdown keeps running during the event.
        let before = scheduler.global_in();
        scheduler.tick(&mut engine, &catalog, &mut rng);
        assert_eq!(scheduler.global_in(), before - 1);
        // Firings that land mid-event are skipped but still reschedule.
        for _ in 0..200 {
            let flashes = scheduler.tick(&mut engine, &catalog, &mut rng);
            assert!(!flashes.iter().any(|f| matches!(f, NewsFlash::Global { .. })));
            assert!((1..=60).contains(&scheduler.global_in()));
        }
    }

    #[test]
    fn test_empty_catalog_still_reschedules() {
        let (mut scheduler, mut engine, _, mut rng) = fixture(5);
        let catalog = NewsCatalog::empty();
        for _ in 0..100 {
            let flashes = scheduler.tick(&mut engine, &catalog, &mut rng);
            assert!(!flashes.iter().any(|f| matches!(f, NewsFlash::Sector { .. })));
            assert!((1..=10).contains(&scheduler.sector_in()));
        }
    }
}
