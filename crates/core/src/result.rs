use serde::{Deserialize, Serialize};

use crate::competitor::Competitor;
use crate::event::Event;

/// Estimated event probabilities for one competitor.
///
/// Serialized flat, one object per competitor, as the presentation layer
/// reads it: `{ "teamId", "teamName", "A", "B", "C", "D", "any" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "teamId")]
    pub team_id: String,
    #[serde(rename = "teamName")]
    pub team_name: String,
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "D")]
    pub d: f64,
    /// Capped sum of the per-event probabilities.
    pub any: f64,
}

impl ResultRecord {
    /// Record with every probability at zero.
    #[must_use]
    pub fn zeroed(competitor: &Competitor) -> Self {
        Self {
            team_id: competitor.id.clone(),
            team_name: competitor.name.clone(),
            a: 0.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            any: 0.0,
        }
    }

    /// Builds a record from raw per-event probabilities (indexed by
    /// [`Event::index`]), rounding each to 5 decimals and capping `any` at 1.
    #[must_use]
    pub fn from_probabilities(competitor: &Competitor, probabilities: [f64; 4]) -> Self {
        let total: f64 = probabilities.iter().sum();
        Self {
            team_id: competitor.id.clone(),
            team_name: competitor.name.clone(),
            a: round5(probabilities[Event::A.index()]),
            b: round5(probabilities[Event::B.index()]),
            c: round5(probabilities[Event::C.index()]),
            d: round5(probabilities[Event::D.index()]),
            any: round5(total.min(1.0)),
        }
    }

    #[must_use]
    pub fn probability(&self, event: Event) -> f64 {
        match event {
            Event::A => self.a,
            Event::B => self.b,
            Event::C => self.c,
            Event::D => self.d,
        }
    }
}

/// Rounds to 5 decimal places.
#[must_use]
pub fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}
