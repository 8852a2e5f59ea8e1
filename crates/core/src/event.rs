use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal prize tiers decided by one full playout of a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Event {
    /// Championship, decided by the combined qualifier bracket.
    A,
    /// Consolation, decided by the quarter-round losers of the combined bracket.
    B,
    /// First lower-tier event.
    C,
    /// Second lower-tier event.
    D,
}

impl Event {
    /// All events in canonical order.
    pub const ALL: [Event; 4] = [Event::A, Event::B, Event::C, Event::D];

    /// Position of the event within [`Event::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Event::A => 0,
            Event::B => 1,
            Event::C => 2,
            Event::D => 3,
        }
    }

    /// Human readable label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Event::A => "Championship",
            Event::B => "Consolation",
            Event::C => "C Event",
            Event::D => "D Event",
        }
    }

    /// Lower-tier events are allowed to be partially unreachable in a trial.
    #[must_use]
    pub fn is_lower_tier(self) -> bool {
        matches!(self, Event::C | Event::D)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Event::A => "A",
            Event::B => "B",
            Event::C => "C",
            Event::D => "D",
        };
        f.write_str(letter)
    }
}
