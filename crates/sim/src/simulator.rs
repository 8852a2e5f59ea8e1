//! Tournament simulator: one randomized playout of a division per trial.
//!
//! A trial evaluates the bracket graph in a fixed global order:
//!
//! 1. every primary (A) qualifying bracket, in declared order;
//! 2. every secondary (B) qualifying bracket, which reads losers published
//!    by step 1;
//! 3. the combined championship, seating the qualifiers of steps 1 and 2,
//!    which decides the A and B events;
//! 4. the lower-tier (C, D) brackets, which read losers published by steps
//!    1 and 2.
//!
//! This order is a topological sort of the slot dependencies for every
//! correctly authored division, so a slot read before it is written signals
//! a malformed graph. Lower-tier events are the one tolerated exception: an
//! unfilled slot there drops only that event from the trial's tally.

use calcutta_core::{BracketGraph, BracketNode, Event, Stage};
use rand::Rng;
use tracing::trace;

use crate::error::SimError;
use crate::outcome::{draw_winner, Side};
use crate::slots::SlotTable;
use crate::strength::{StrengthTable, NEUTRAL};

/// Winners of one trial, by event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTally<'a> {
    winners: [Option<&'a str>; 4],
    unfilled: [bool; 4],
}

impl<'a> EventTally<'a> {
    #[must_use]
    pub fn winner(&self, event: Event) -> Option<&'a str> {
        self.winners[event.index()]
    }

    /// True when the event's bracket exists but could not be completed.
    #[must_use]
    pub fn is_unfilled(&self, event: Event) -> bool {
        self.unfilled[event.index()]
    }

    /// Decided events and their winners, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Event, &'a str)> + '_ {
        Event::ALL
            .into_iter()
            .filter_map(|event| self.winner(event).map(|id| (event, id)))
    }

    fn record(&mut self, event: Event, winner: &'a str) {
        self.winners[event.index()] = Some(winner);
    }

    fn mark_unfilled(&mut self, event: Event) {
        self.unfilled[event.index()] = true;
    }
}

/// Plays out a bracket graph with fixed, precomputed strengths.
#[derive(Debug, Clone, Copy)]
pub struct TournamentSimulator<'a> {
    graph: &'a BracketGraph,
    strengths: &'a StrengthTable,
}

impl<'a> TournamentSimulator<'a> {
    #[must_use]
    pub fn new(graph: &'a BracketGraph, strengths: &'a StrengthTable) -> Self {
        Self { graph, strengths }
    }

    /// Runs one full trial with a fresh slot table.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph is malformed: a slot read before it is
    /// written outside a lower-tier bracket, a slot written twice, an unknown
    /// competitor, or a championship pairing out of range.
    pub fn run_trial<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<EventTally<'a>, SimError> {
        let mut slots = SlotTable::new();
        let mut tally = EventTally::default();

        let mut qualifiers = Vec::with_capacity(self.graph.qualifier_count());
        for phase in self.graph.qualifying_phases() {
            qualifiers.push(self.resolve(phase.root, &mut slots, rng)?);
        }

        let (champion, consolation) = self.play_championship(&qualifiers, rng)?;
        tally.record(Event::A, champion);
        tally.record(Event::B, consolation);

        for phase in self.graph.lower_tier_phases() {
            let Stage::LowerTier(event) = phase.stage else {
                continue;
            };
            match self.resolve(phase.root, &mut slots, rng) {
                Ok(winner) => tally.record(event, winner),
                Err(err) if err.is_ordering_error() => {
                    trace!(event = %event, error = %err, "Lower-tier event skipped");
                    tally.mark_unfilled(event);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(tally)
    }

    /// Resolves a node to the competitor it produces, children first.
    ///
    /// Losers of matches with a loser destination are published to `slots`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnresolvedSlot`] for a slot not yet written in this
    /// trial, [`SimError::SlotAlreadyFilled`] for a second write, and
    /// [`SimError::UnknownCompetitor`] for an id without a strength.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        node: &'a BracketNode,
        slots: &mut SlotTable<'a>,
        rng: &mut R,
    ) -> Result<&'a str, SimError> {
        match node {
            BracketNode::Competitor(id) => {
                if self.strengths.contains(id) {
                    Ok(id.as_str())
                } else {
                    Err(SimError::UnknownCompetitor { id: id.clone() })
                }
            }
            BracketNode::Slot(name) => slots.resolve(name),
            BracketNode::Match(m) => {
                let left = self.resolve(&m.left, slots, rng)?;
                let right = self.resolve(&m.right, slots, rng)?;
                let (winner, loser) = self.play(left, right, rng);
                if let Some(slot) = &m.loser_destination {
                    slots.publish(slot, loser)?;
                }
                Ok(winner)
            }
        }
    }

    /// Plays the combined championship and its consolation mirror.
    ///
    /// Quarter-round matches seat qualifiers by `quarterSeed`; their winners
    /// meet by `semiPairs` and play down to a champion. The quarter-round
    /// losers are paired the same way to decide the consolation champion.
    fn play_championship<R: Rng + ?Sized>(
        &self,
        qualifiers: &[&'a str],
        rng: &mut R,
    ) -> Result<(&'a str, &'a str), SimError> {
        let config = &self.graph.championship;
        if config.quarter_seed.is_empty() {
            return Err(SimError::EmptyRound {
                round: "quarter round",
            });
        }

        let mut quarter_winners = Vec::with_capacity(config.quarter_seed.len());
        let mut quarter_losers = Vec::with_capacity(config.quarter_seed.len());
        for &[i, j] in &config.quarter_seed {
            let a = pick(qualifiers, i, "quarter round")?;
            let b = pick(qualifiers, j, "quarter round")?;
            let (winner, loser) = self.play(a, b, rng);
            quarter_winners.push(winner);
            quarter_losers.push(loser);
        }

        let champion = self.play_bracket_half(quarter_winners, "semi round", rng)?;
        let consolation = self.play_bracket_half(quarter_losers, "consolation semi round", rng)?;
        Ok((champion, consolation))
    }

    /// Semi round by `semiPairs` followed by the final.
    fn play_bracket_half<R: Rng + ?Sized>(
        &self,
        entrants: Vec<&'a str>,
        round: &'static str,
        rng: &mut R,
    ) -> Result<&'a str, SimError> {
        let pairs = &self.graph.championship.semi_pairs;
        if pairs.is_empty() {
            return self.play_down(entrants, round, rng);
        }
        let mut semi_winners = Vec::with_capacity(pairs.len());
        for &[i, j] in pairs {
            let a = pick(&entrants, i, round)?;
            let b = pick(&entrants, j, round)?;
            semi_winners.push(self.play(a, b, rng).0);
        }
        self.play_down(semi_winners, round, rng)
    }

    /// Plays adjacent pairs round after round until one entrant remains.
    /// An odd entrant out advances on a bye.
    fn play_down<R: Rng + ?Sized>(
        &self,
        mut entrants: Vec<&'a str>,
        round: &'static str,
        rng: &mut R,
    ) -> Result<&'a str, SimError> {
        while entrants.len() > 1 {
            entrants = entrants
                .chunks(2)
                .map(|pair| match pair {
                    &[a, b] => self.play(a, b, rng).0,
                    bye => bye[0],
                })
                .collect();
        }
        entrants.pop().ok_or(SimError::EmptyRound { round })
    }

    /// Decides one match and returns `(winner, loser)`.
    fn play<R: Rng + ?Sized>(&self, left: &'a str, right: &'a str, rng: &mut R) -> (&'a str, &'a str) {
        match draw_winner(rng, self.strength(left), self.strength(right)) {
            Side::Left => (left, right),
            Side::Right => (right, left),
        }
    }

    fn strength(&self, id: &str) -> f64 {
        self.strengths.get(id).unwrap_or(NEUTRAL)
    }
}

fn pick<'a>(entrants: &[&'a str], index: usize, round: &'static str) -> Result<&'a str, SimError> {
    entrants
        .get(index)
        .copied()
        .ok_or(SimError::QualifierIndex {
            round,
            index,
            available: entrants.len(),
        })
}
