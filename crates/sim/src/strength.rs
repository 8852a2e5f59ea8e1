//! Strength model: folds a competitor's record into one scalar in [0, 1].
//!
//! Three signals are blended with [`StrengthWeights`]:
//!
//! - standings: win percentage, ties counted as half a win;
//! - head-to-head: aggregate win rate against tracked opponents;
//! - seed: 1.0 for the top seed falling linearly to 0.0 at the seed ceiling.
//!
//! A missing signal falls back to a neutral 0.5. When a competitor has no
//! head-to-head data at all, the head-to-head weight is redistributed to the
//! standings and seed weights in proportion to their size, so sparse data
//! does not compress the strength toward the middle. With no standings or
//! seed weight to receive it, the head-to-head weight is simply dropped.

use calcutta_core::{Competitor, StrengthWeights};
use std::collections::HashMap;

/// Value of a signal that carries no information.
pub const NEUTRAL: f64 = 0.5;

/// Win percentage with ties as half wins; 0.5 with no games played.
#[must_use]
pub fn standings_signal(competitor: &Competitor) -> f64 {
    let games = competitor.games_played();
    if games == 0 {
        return NEUTRAL;
    }
    (f64::from(competitor.wins) + 0.5 * f64::from(competitor.ties)) / f64::from(games)
}

/// Aggregate win rate across all tracked opponents; 0.5 without data.
#[must_use]
pub fn h2h_signal(competitor: &Competitor) -> f64 {
    let (wins, games) = competitor
        .h2h
        .values()
        .fold((0u64, 0u64), |(w, g), rec| {
            (w + u64::from(rec.wins), g + u64::from(rec.games()))
        });
    if games == 0 {
        return NEUTRAL;
    }
    wins as f64 / games as f64
}

/// Seed 1 maps to 1.0, `ceiling` and beyond to 0.0, linear in between.
#[must_use]
pub fn seed_signal(seed: u32, ceiling: u32) -> f64 {
    if ceiling <= 1 {
        return if seed <= 1 { 1.0 } else { 0.0 };
    }
    let span = f64::from(ceiling - 1);
    ((f64::from(ceiling) - f64::from(seed)) / span).clamp(0.0, 1.0)
}

/// Weights actually applied to one competitor after redistribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveWeights {
    pub standings: f64,
    pub h2h: f64,
    pub seed: f64,
}

impl EffectiveWeights {
    /// Resolves the configured weights for `competitor`.
    #[must_use]
    pub fn for_competitor(competitor: &Competitor, weights: &StrengthWeights) -> Self {
        let mut effective = Self {
            standings: weights.standings,
            h2h: weights.h2h,
            seed: weights.seed,
        };

        if competitor.has_head_to_head() {
            return effective;
        }
        let others = effective.standings + effective.seed;
        if others > 0.0 {
            let extra = effective.h2h;
            effective.standings += extra * (weights.standings / others);
            effective.seed += extra * (weights.seed / others);
        }
        effective.h2h = 0.0;
        effective
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.standings + self.h2h + self.seed
    }
}

/// The three raw signals of one competitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    pub standings: f64,
    pub h2h: f64,
    pub seed: f64,
}

impl Signals {
    #[must_use]
    pub fn for_competitor(competitor: &Competitor, weights: &StrengthWeights) -> Self {
        Self {
            standings: standings_signal(competitor),
            h2h: h2h_signal(competitor),
            seed: seed_signal(competitor.seed, weights.seed_ceiling),
        }
    }
}

/// Weighted blend of the three signals, normalized by the total weight.
///
/// Returns 0.0 when every weight is zero, which makes every match a coin flip.
#[must_use]
pub fn composite_strength(competitor: &Competitor, weights: &StrengthWeights) -> f64 {
    let w = EffectiveWeights::for_competitor(competitor, weights);
    let total = w.total();
    if total <= 0.0 {
        return 0.0;
    }
    let s = Signals::for_competitor(competitor, weights);
    let blended = w.standings * s.standings + w.h2h * s.h2h + w.seed * s.seed;
    (blended / total).clamp(0.0, 1.0)
}

/// Strength of every competitor in a division, keyed by competitor id.
///
/// Computed once before the trial loop and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct StrengthTable {
    values: HashMap<String, f64>,
}

impl StrengthTable {
    /// Computes the strength of each competitor.
    #[must_use]
    pub fn compute(competitors: &[Competitor], weights: &StrengthWeights) -> Self {
        let values = competitors
            .iter()
            .map(|c| (c.id.clone(), composite_strength(c, weights)))
            .collect();
        Self { values }
    }

    /// Builds a table from explicit values.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(id, s)| (id.into(), s)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
