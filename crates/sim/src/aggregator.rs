//! Monte Carlo aggregation of tournament trials into event probabilities.
//!
//! # Example
//!
//! ```ignore
//! use calcutta_sim::{OddsConfig, OddsSimulator};
//!
//! let simulator = OddsSimulator::new(OddsConfig::new(50_000).with_seed(42));
//! let report = simulator.simulate(&competitors, &graph)?;
//! for record in &report.records {
//!     println!("{}: {:.1}%", record.team_name, record.a * 100.0);
//! }
//! ```

use std::collections::HashMap;

use calcutta_core::stats::wilson_ci;
use calcutta_core::{AppConfig, BracketGraph, Competitor, Event, ResultRecord, StrengthWeights};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SimError;
use crate::simulator::TournamentSimulator;
use crate::strength::StrengthTable;

/// Configuration for an odds run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsConfig {
    /// Number of independent trials to run.
    pub n_trials: usize,
    /// Signal weights of the strength model.
    pub weights: StrengthWeights,
    /// Optional seed for reproducible results.
    pub seed: Option<u64>,
}

impl Default for OddsConfig {
    fn default() -> Self {
        Self {
            n_trials: 50_000,
            weights: StrengthWeights::default(),
            seed: None,
        }
    }
}

impl OddsConfig {
    /// Creates a configuration running `n_trials` trials with default weights.
    #[must_use]
    pub fn new(n_trials: usize) -> Self {
        Self {
            n_trials,
            ..Default::default()
        }
    }

    /// Takes trials, seed and weights from the application config.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            n_trials: config.simulation.trials,
            weights: config.weights,
            seed: config.simulation.seed,
        }
    }

    /// Sets the strength weights.
    #[must_use]
    pub fn with_weights(mut self, weights: StrengthWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets a seed for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Outcome of an odds run for one division.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsReport {
    /// One record per competitor, in input order.
    pub records: Vec<ResultRecord>,
    /// Raw win counts per competitor, aligned with `records` and indexed by
    /// [`Event::index`].
    pub wins: Vec<[u64; 4]>,
    /// Trials in which each event's bracket existed but could not complete.
    pub skipped: [u64; 4],
    /// Number of trials run.
    pub n_trials: usize,
}

impl OddsReport {
    /// Report with every probability at zero and no trials run.
    #[must_use]
    pub fn zeroed(competitors: &[Competitor]) -> Self {
        Self {
            records: competitors.iter().map(ResultRecord::zeroed).collect(),
            wins: vec![[0; 4]; competitors.len()],
            skipped: [0; 4],
            n_trials: 0,
        }
    }

    /// Wilson interval around the estimate for the competitor at `index`.
    #[must_use]
    pub fn interval(&self, index: usize, event: Event, z: f64) -> (f64, f64) {
        let successes = self.wins.get(index).map_or(0, |w| w[event.index()]);
        wilson_ci(successes, self.n_trials as u64, z)
    }

    #[must_use]
    pub fn skipped(&self, event: Event) -> u64 {
        self.skipped[event.index()]
    }
}

/// Runs many tournament trials and turns win counts into probabilities.
pub struct OddsSimulator {
    config: OddsConfig,
}

impl OddsSimulator {
    /// Creates a new simulator with the given configuration.
    #[must_use]
    pub fn new(config: OddsConfig) -> Self {
        Self { config }
    }

    /// Creates a simulator with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(OddsConfig::default())
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &OddsConfig {
        &self.config
    }

    /// Computes strengths from the competitors' records and runs every trial.
    ///
    /// Fewer than two competitors, or zero trials, yields a zeroed report
    /// without drawing a single random number.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimError`] raised by a trial. A malformed bracket
    /// aborts the whole run.
    pub fn simulate(
        &self,
        competitors: &[Competitor],
        graph: &BracketGraph,
    ) -> Result<OddsReport, SimError> {
        if self.is_degenerate(competitors) {
            return Ok(OddsReport::zeroed(competitors));
        }
        let strengths = StrengthTable::compute(competitors, &self.config.weights);
        debug!(competitors = competitors.len(), "Strengths computed");
        self.simulate_with_strengths(competitors, graph, &strengths)
    }

    /// Runs every trial with precomputed strengths.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimError`] raised by a trial.
    pub fn simulate_with_strengths(
        &self,
        competitors: &[Competitor],
        graph: &BracketGraph,
        strengths: &StrengthTable,
    ) -> Result<OddsReport, SimError> {
        if self.is_degenerate(competitors) {
            return Ok(OddsReport::zeroed(competitors));
        }
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.run_trials(competitors, graph, strengths, &mut rng)
    }

    /// Runs every trial drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimError`] raised by a trial, or
    /// [`SimError::UnknownCompetitor`] when an event winner has a strength but
    /// is not among `competitors`.
    pub fn run_trials<R: Rng + ?Sized>(
        &self,
        competitors: &[Competitor],
        graph: &BracketGraph,
        strengths: &StrengthTable,
        rng: &mut R,
    ) -> Result<OddsReport, SimError> {
        let n_trials = self.config.n_trials;
        if self.is_degenerate(competitors) {
            return Ok(OddsReport::zeroed(competitors));
        }

        let simulator = TournamentSimulator::new(graph, strengths);
        let mut counts: HashMap<&str, [u64; 4]> = competitors
            .iter()
            .map(|c| (c.id.as_str(), [0; 4]))
            .collect();
        let mut skipped = [0u64; 4];

        for _ in 0..n_trials {
            let tally = simulator.run_trial(rng)?;
            for event in Event::ALL {
                if let Some(id) = tally.winner(event) {
                    let row = counts
                        .get_mut(id)
                        .ok_or_else(|| SimError::UnknownCompetitor { id: id.to_string() })?;
                    row[event.index()] += 1;
                } else if tally.is_unfilled(event) {
                    skipped[event.index()] += 1;
                }
            }
        }

        for event in Event::ALL {
            let count = skipped[event.index()];
            if count > 0 {
                warn!(
                    event = %event,
                    skipped = count,
                    trials = n_trials,
                    "Event unresolved in some trials; omitted from their tally"
                );
            }
        }

        let wins: Vec<[u64; 4]> = competitors
            .iter()
            .map(|c| counts.get(c.id.as_str()).copied().unwrap_or_default())
            .collect();
        let records = competitors
            .iter()
            .zip(&wins)
            .map(|(c, row)| {
                ResultRecord::from_probabilities(c, row.map(|n| n as f64 / n_trials as f64))
            })
            .collect();

        info!(
            competitors = competitors.len(),
            trials = n_trials,
            "Simulation complete"
        );

        Ok(OddsReport {
            records,
            wins,
            skipped,
            n_trials,
        })
    }

    fn is_degenerate(&self, competitors: &[Competitor]) -> bool {
        competitors.len() < 2 || self.config.n_trials == 0
    }
}

/// Estimates event probabilities for every competitor of a division.
///
/// # Errors
///
/// Returns the first [`SimError`] raised by a trial.
pub fn simulate(
    competitors: &[Competitor],
    graph: &BracketGraph,
    weights: &StrengthWeights,
    n_trials: usize,
    seed: Option<u64>,
) -> Result<Vec<ResultRecord>, SimError> {
    let config = OddsConfig {
        n_trials,
        weights: *weights,
        seed,
    };
    OddsSimulator::new(config)
        .simulate(competitors, graph)
        .map(|report| report.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcutta_core::{BracketNode, ChampionshipConfig};
    use rand::rngs::mock::StepRng;

    // ============================================================
    // Test Helpers
    // ============================================================

    fn competitors(ids: &[&str]) -> Vec<Competitor> {
        ids.iter()
            .map(|id| Competitor::new(*id, id.to_uppercase()))
            .collect()
    }

    /// Two teams meet once; the loser takes the consolation.
    fn head_to_head_graph() -> BracketGraph {
        BracketGraph {
            a_event: vec![BracketNode::team("a"), BracketNode::team("b")],
            b_event: Vec::new(),
            championship: ChampionshipConfig::standard(2),
            c_event: None,
            d_event: None,
        }
    }

    // ============================================================
    // OddsConfig Tests
    // ============================================================

    #[test]
    fn config_defaults() {
        let config = OddsConfig::default();
        assert_eq!(config.n_trials, 50_000);
        assert!(config.seed.is_none());
        assert_eq!(config.weights, StrengthWeights::default());
    }

    #[test]
    fn config_builders() {
        let config = OddsConfig::new(1_000)
            .with_seed(9)
            .with_weights(StrengthWeights::new(1.0, 0.0, 0.0));
        assert_eq!(config.n_trials, 1_000);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.weights.standings, 1.0);
    }

    #[test]
    fn config_from_app_config() {
        let mut app = AppConfig::default();
        app.simulation.trials = 123;
        app.simulation.seed = Some(5);

        let config = OddsConfig::from_app_config(&app);

        assert_eq!(config.n_trials, 123);
        assert_eq!(config.seed, Some(5));
    }

    // ============================================================
    // Degenerate Input Tests
    // ============================================================

    #[test]
    fn single_competitor_is_zeroed() {
        let report = OddsSimulator::new(OddsConfig::new(100).with_seed(1))
            .simulate(&competitors(&["a"]), &head_to_head_graph())
            .unwrap();

        assert_eq!(report.n_trials, 0);
        assert_eq!(report.records, vec![ResultRecord::zeroed(&competitors(&["a"])[0])]);
    }

    #[test]
    fn zero_trials_is_zeroed() {
        let report = OddsSimulator::new(OddsConfig::new(0))
            .simulate(&competitors(&["a", "b"]), &head_to_head_graph())
            .unwrap();

        assert!(report.records.iter().all(|r| r.any == 0.0));
        assert_eq!(report.interval(0, Event::A, 1.96), (0.0, 0.0));
    }

    // ============================================================
    // Aggregation Tests
    // ============================================================

    #[test]
    fn counts_follow_deterministic_draws() {
        let strengths = StrengthTable::from_values([("a", 1.0), ("b", 1.0)]);
        let simulator = OddsSimulator::new(OddsConfig::new(10));

        let report = simulator
            .run_trials(
                &competitors(&["a", "b"]),
                &head_to_head_graph(),
                &strengths,
                &mut StepRng::new(0, 0),
            )
            .unwrap();

        assert_eq!(report.wins, vec![[10, 0, 0, 0], [0, 10, 0, 0]]);
        assert_eq!(report.records[0].a, 1.0);
        assert_eq!(report.records[1].b, 1.0);
        assert_eq!(report.records[1].any, 1.0);
    }

    #[test]
    fn unfilled_lower_tier_is_counted_as_skipped() {
        let mut graph = head_to_head_graph();
        graph.c_event = Some(BracketNode::matchup(
            BracketNode::team("a"),
            BracketNode::slot("MISSING"),
        ));
        let strengths = StrengthTable::from_values([("a", 1.0), ("b", 1.0)]);

        let report = OddsSimulator::new(OddsConfig::new(25))
            .run_trials(
                &competitors(&["a", "b"]),
                &graph,
                &strengths,
                &mut StepRng::new(0, 0),
            )
            .unwrap();

        assert_eq!(report.skipped(Event::C), 25);
        assert_eq!(report.skipped(Event::D), 0);
        assert_eq!(report.records[0].c, 0.0);
    }

    #[test]
    fn malformed_qualifying_bracket_aborts_run() {
        let mut graph = head_to_head_graph();
        graph.b_event.push(BracketNode::slot("L1"));
        graph.championship = ChampionshipConfig::standard(3);

        let err = OddsSimulator::new(OddsConfig::new(10).with_seed(3))
            .simulate(&competitors(&["a", "b"]), &graph)
            .unwrap_err();

        assert_eq!(err, SimError::UnresolvedSlot { slot: "L1".into() });
    }

    #[test]
    fn winner_outside_competitor_list_is_an_error() {
        let mut graph = head_to_head_graph();
        graph.a_event[1] = BracketNode::team("c");
        let strengths = StrengthTable::from_values([("a", 1.0), ("b", 1.0), ("c", 1.0)]);

        let err = OddsSimulator::new(OddsConfig::new(5))
            .run_trials(
                &competitors(&["a", "b"]),
                &graph,
                &strengths,
                &mut StepRng::new(0, 0),
            )
            .unwrap_err();

        assert_eq!(err, SimError::UnknownCompetitor { id: "c".into() });
    }

    #[test]
    fn interval_brackets_the_estimate() {
        let report = OddsSimulator::new(OddsConfig::new(2_000).with_seed(11))
            .simulate(&competitors(&["a", "b"]), &head_to_head_graph())
            .unwrap();

        let (lower, upper) = report.interval(0, Event::A, 1.96);

        assert!(lower <= report.records[0].a && report.records[0].a <= upper);
        assert!(upper - lower < 0.05);
    }

    #[test]
    fn convenience_simulate_returns_records() {
        let records = simulate(
            &competitors(&["a", "b"]),
            &head_to_head_graph(),
            &StrengthWeights::default(),
            1_000,
            Some(17),
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].team_name, "A");
        assert!((records[0].a + records[1].a - 1.0).abs() < 1e-9);
    }
}
