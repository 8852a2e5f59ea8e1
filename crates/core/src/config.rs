use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub weights: StrengthWeights,
    pub data: DataConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Trials per division.
    pub trials: usize,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
}

/// Relative weights of the strength signals.
///
/// The three components need not sum to 1; they are treated as proportions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthWeights {
    pub standings: f64,
    pub h2h: f64,
    /// Weight of the seed signal; the authoring tools call it `draw`.
    #[serde(alias = "draw")]
    pub seed: f64,
    /// Seed at or beyond which the seed signal contributes nothing.
    pub seed_ceiling: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding `teams_<division>.json` and `bracket_<division>.json`.
    pub dir: String,
    pub divisions: Vec<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 50_000,
            seed: None,
        }
    }
}

impl Default for StrengthWeights {
    fn default() -> Self {
        Self {
            standings: 0.5,
            h2h: 0.3,
            seed: 0.2,
            seed_ceiling: 50,
        }
    }
}

impl StrengthWeights {
    #[must_use]
    pub fn new(standings: f64, h2h: f64, seed: f64) -> Self {
        Self {
            standings,
            h2h,
            seed,
            ..Self::default()
        }
    }

    /// Sets the seed ceiling.
    #[must_use]
    pub fn with_seed_ceiling(mut self, ceiling: u32) -> Self {
        self.seed_ceiling = ceiling;
        self
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.standings + self.h2h + self.seed
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            divisions: vec!["mens".to_string(), "womens".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let config = AppConfig::default();

        assert_eq!(config.simulation.trials, 50_000);
        assert!(config.simulation.seed.is_none());
        assert_eq!(config.weights, StrengthWeights::new(0.5, 0.3, 0.2));
        assert_eq!(config.weights.seed_ceiling, 50);
        assert_eq!(config.data.divisions, vec!["mens", "womens"]);
    }

    #[test]
    fn weights_accept_draw_alias() {
        let weights: StrengthWeights =
            serde_json::from_str(r#"{ "standings": 0.6, "h2h": 0.2, "draw": 0.2 }"#).unwrap();

        assert_eq!(weights.seed, 0.2);
        assert_eq!(weights.seed_ceiling, 50);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "simulation": { "seed": 7 } }"#).unwrap();

        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.trials, 50_000);
        assert_eq!(config.data.dir, "data");
    }
}
