//! News catalog.
//!
//! Sector headlines are loaded from a line-oriented resource file
//! (`industry,tone,content` — comma-delimited, no escaping, so content
//! must not contain commas). When the file is absent the catalog falls back
//! to one synthesized favorable and one unfavorable line per industry, with
//! a single non-fatal warning. Market-wide headlines are built in.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use crate::types::{Industry, NewsTone};

// ---------------------------------------------------------------------------
// Built-in global headlines
// ---------------------------------------------------------------------------

const GLOBAL_FAVORABLE: &[&str] = &[
    "Markets rally on expected interest rate cut",
    "Economic recovery hopes spread",
    "Trade agreement signed with the United States",
    "Domestic growth forecast revised upward",
    "Government announces stimulus package",
];

const GLOBAL_UNFAVORABLE: &[&str] = &[
    "Markets slide on interest rate hike fears",
    "Recession worries deepen",
    "Global trade war declared",
    "Domestic growth forecast revised downward",
    "Major corporate scandal erupts",
];

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Favorable and unfavorable headline pools for one industry.
#[derive(Debug, Clone, Default)]
pub struct NewsBucket {
    pub favorable: Vec<String>,
    pub unfavorable: Vec<String>,
}

impl NewsBucket {
    fn lines(&self, tone: NewsTone) -> &[String] {
        match tone {
            NewsTone::Favorable => &self.favorable,
            NewsTone::Unfavorable => &self.unfavorable,
        }
    }

    fn push(&mut self, tone: NewsTone, content: String) {
        match tone {
            NewsTone::Favorable => self.favorable.push(content),
            NewsTone::Unfavorable => self.unfavorable.push(content),
        }
    }
}

/// Industry-keyed sector headlines plus the built-in global headline lists.
#[derive(Debug, Clone)]
pub struct NewsCatalog {
    sectors: BTreeMap<Industry, NewsBucket>,
}

impl NewsCatalog {
    /// Load the catalog from a resource file. Never fails: an absent or
    /// unreadable file falls back to the synthesized catalog with a warning,
    /// and malformed lines are skipped individually.
    pub fn load(path: &str) -> Self {
        if !Path::new(path).exists() {
            warn!(path, "News file not found, using synthesized headlines");
            return Self::synthesized();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let catalog = Self::parse(&contents);
                let lines: usize = catalog
                    .sectors
                    .values()
                    .map(|b| b.favorable.len() + b.unfavorable.len())
                    .sum();
                if lines == 0 {
                    warn!(path, "News file contained no usable lines, using synthesized headlines");
                    return Self::synthesized();
                }
                info!(path, industries = catalog.sectors.len(), lines, "News catalog loaded");
                catalog
            }
            Err(e) => {
                warn!(path, error = %e, "Failed to read news file, using synthesized headlines");
                Self::synthesized()
            }
        }
    }

    /// Parse `industry,tone,content` lines. Blank lines and `#` comments are
    /// ignored; anything else that fails to parse is skipped with a warning.
    pub fn parse(contents: &str) -> Self {
        let mut sectors: BTreeMap<Industry, NewsBucket> = BTreeMap::new();
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.splitn(3, ',');
            let (industry, tone, content) =
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(i), Some(t), Some(c)) => (i, t, c),
                    _ => {
                        warn!(line = lineno + 1, "Skipping malformed news line");
                        continue;
                    }
                };
            let industry: Industry = match industry.parse() {
                Ok(i) => i,
                Err(e) => {
                    warn!(line = lineno + 1, error = %e, "Skipping news line");
                    continue;
                }
            };
            let tone: NewsTone = match tone.parse() {
                Ok(t) => t,
                Err(e) => {
                    warn!(line = lineno + 1, error = %e, "Skipping news line");
                    continue;
                }
            };
            sectors
                .entry(industry)
                .or_default()
                .push(tone, content.trim().to_string());
        }
        Self { sectors }
    }

    /// Placeholder catalog: one favorable and one unfavorable line per
    /// industry in the fixed set.
    pub fn synthesized() -> Self {
        let mut sectors = BTreeMap::new();
        for &industry in Industry::ALL {
            sectors.insert(
                industry,
                NewsBucket {
                    favorable: vec![format!("Good news for the {industry} sector")],
                    unfavorable: vec![format!("Bad news for the {industry} sector")],
                },
            );
        }
        Self { sectors }
    }

    /// Number of industries with at least one headline.
    pub fn industry_count(&self) -> usize {
        self.sectors.len()
    }

    /// Draw a sector headline: uniform industry, uniform tone, uniform line.
    /// Returns None when the catalog is empty or the drawn bucket has no
    /// lines for the drawn tone (the empty-bucket guard).
    pub fn pick_sector(&self, rng: &mut impl Rng) -> Option<(Industry, NewsTone, &str)> {
        let industries: Vec<Industry> = self.sectors.keys().copied().collect();
        let industry = *industries.choose(rng)?;
        let tone = if rng.gen_bool(0.5) {
            NewsTone::Favorable
        } else {
            NewsTone::Unfavorable
        };
        let headline = self.sectors.get(&industry)?.lines(tone).choose(rng)?;
        Some((industry, tone, headline.as_str()))
    }

    /// Draw a market-wide headline: uniform tone, uniform line.
    pub fn pick_global(&self, rng: &mut impl Rng) -> Option<(NewsTone, &str)> {
        let (tone, pool) = if rng.gen_bool(0.5) {
            (NewsTone::Favorable, GLOBAL_FAVORABLE)
        } else {
            (NewsTone::Unfavorable, GLOBAL_UNFAVORABLE)
        };
        pool.choose(rng).map(|&h| (tone, h))
    }

    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self {
            sectors: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
