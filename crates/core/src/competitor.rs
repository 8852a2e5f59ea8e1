//! Competitor records as produced by the roster and standings tooling.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::DataError;

/// Seed assumed for a competitor with no prior ranking.
pub const UNRANKED_SEED: u32 = 50;

fn default_seed() -> u32 {
    UNRANKED_SEED
}

/// Record against one specific opponent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    #[serde(rename = "w", alias = "wins", default)]
    pub wins: u32,
    #[serde(rename = "l", alias = "losses", default)]
    pub losses: u32,
}

impl HeadToHead {
    #[must_use]
    pub fn new(wins: u32, losses: u32) -> Self {
        Self { wins, losses }
    }

    #[must_use]
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }
}

/// A single entrant in a division.
///
/// Competitors are loaded once per division and never mutated during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    /// Stable key, unique within the division.
    pub id: String,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    /// Prior ranking, 1 = strongest.
    #[serde(default = "default_seed")]
    pub seed: u32,
    /// Records against specific opponents, keyed by opponent id.
    #[serde(default)]
    pub h2h: BTreeMap<String, HeadToHead>,
}

impl Competitor {
    /// Creates a competitor with an empty record and no prior ranking.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            wins: 0,
            losses: 0,
            ties: 0,
            seed: UNRANKED_SEED,
            h2h: BTreeMap::new(),
        }
    }

    /// Sets the win/loss/tie totals.
    #[must_use]
    pub fn with_record(mut self, wins: u32, losses: u32, ties: u32) -> Self {
        self.wins = wins;
        self.losses = losses;
        self.ties = ties;
        self
    }

    /// Sets the prior ranking.
    #[must_use]
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Adds a head-to-head record against `opponent`.
    #[must_use]
    pub fn with_head_to_head(mut self, opponent: impl Into<String>, record: HeadToHead) -> Self {
        self.h2h.insert(opponent.into(), record);
        self
    }

    #[must_use]
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// True when any opponent-specific record is tracked.
    #[must_use]
    pub fn has_head_to_head(&self) -> bool {
        !self.h2h.is_empty()
    }
}

/// Checks the per-division invariants: unique ids and 1-based seeds.
///
/// # Errors
///
/// Returns the first violation found, in input order.
pub fn validate_competitors(competitors: &[Competitor]) -> Result<(), DataError> {
    let mut seen = HashSet::with_capacity(competitors.len());
    for competitor in competitors {
        if !seen.insert(competitor.id.as_str()) {
            return Err(DataError::DuplicateCompetitor(competitor.id.clone()));
        }
        if competitor.seed == 0 {
            return Err(DataError::InvalidSeed {
                id: competitor.id.clone(),
                seed: competitor.seed,
            });
        }
    }
    Ok(())
}
