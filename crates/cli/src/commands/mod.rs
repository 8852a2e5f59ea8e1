//! CLI commands for the Calcutta odds calculator.

pub mod calculate_odds;
pub mod show_strengths;
pub mod validate_bracket;

pub use calculate_odds::{run_calculate_odds, CalculateOddsArgs};
pub use show_strengths::{run_show_strengths, ShowStrengthsArgs};
pub use validate_bracket::{run_validate_bracket, ValidateBracketArgs};

use anyhow::{anyhow, Context, Result};
use calcutta_core::{AppConfig, ConfigLoader, DataError, Division, DivisionStore, StrengthWeights};
use clap::Args;

/// Division selection and data location shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct DivisionArgs {
    /// Divisions to process (default: from config, `mens womens`)
    #[arg(short, long, num_args = 1..)]
    pub divisions: Vec<String>,

    /// Directory holding teams_<division>.json and bracket_<division>.json
    #[arg(long, env = "CALCUTTA_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Config file path (default: config/Calcutta.toml)
    #[arg(short, long)]
    pub config: Option<String>,
}

impl DivisionArgs {
    /// Loads the configuration and applies the command-line overrides.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from(path)
                .with_context(|| format!("Failed to load config from {path}"))?,
            None => ConfigLoader::load().context("Failed to load config")?,
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut AppConfig) {
        if !self.divisions.is_empty() {
            config.data.divisions = self.divisions.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data.dir = dir.clone();
        }
    }
}

/// Strength-model weight overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct WeightArgs {
    /// Weight of the standings (win percentage) signal
    #[arg(long)]
    pub standings_weight: Option<f64>,

    /// Weight of the head-to-head signal
    #[arg(long)]
    pub h2h_weight: Option<f64>,

    /// Weight of the seed signal
    #[arg(long)]
    pub draw_weight: Option<f64>,
}

impl WeightArgs {
    /// Overrides the configured weights with any weight given on the command line.
    pub fn apply(&self, weights: &mut StrengthWeights) -> Result<()> {
        if let Some(w) = self.standings_weight {
            weights.standings = w;
        }
        if let Some(w) = self.h2h_weight {
            weights.h2h = w;
        }
        if let Some(w) = self.draw_weight {
            weights.seed = w;
        }
        if [weights.standings, weights.h2h, weights.seed]
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(anyhow!("Weights must be finite and non-negative"));
        }
        Ok(())
    }
}

/// Output format for command reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parses an output format from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

/// Loads a division, treating missing files as a skip rather than a failure.
pub fn load_or_skip(store: &DivisionStore, division: &str) -> Result<Option<Division>> {
    match store.load_division(division) {
        Ok(loaded) => Ok(Some(loaded)),
        Err(DataError::Missing(path)) => {
            tracing::warn!(
                division,
                path = %path.display(),
                "Division file not found, skipping"
            );
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load division '{division}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================
    // OutputFormat Tests
    // ============================================

    #[test]
    fn output_format_parse() {
        assert_eq!(OutputFormat::parse("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("TXT").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("Json").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::parse("csv").is_err());
    }

    // ============================================
    // Override Tests
    // ============================================

    #[test]
    fn division_args_override_config() {
        let args = DivisionArgs {
            divisions: vec!["womens".to_string()],
            data_dir: Some("fixtures".to_string()),
            config: None,
        };
        let mut config = AppConfig::default();

        args.apply(&mut config);

        assert_eq!(config.data.divisions, vec!["womens"]);
        assert_eq!(config.data.dir, "fixtures");
    }

    #[test]
    fn empty_division_args_keep_config() {
        let mut config = AppConfig::default();
        DivisionArgs::default().apply(&mut config);
        assert_eq!(config.data, AppConfig::default().data);
    }

    #[test]
    fn weight_args_override_only_given_weights() {
        let args = WeightArgs {
            draw_weight: Some(0.6),
            ..Default::default()
        };
        let mut weights = StrengthWeights::default();

        args.apply(&mut weights).unwrap();

        assert_eq!(weights.standings, 0.5);
        assert_eq!(weights.h2h, 0.3);
        assert_eq!(weights.seed, 0.6);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let args = WeightArgs {
            h2h_weight: Some(-1.0),
            ..Default::default()
        };
        assert!(args.apply(&mut StrengthWeights::default()).is_err());
    }

    #[test]
    fn missing_division_is_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = DivisionStore::new(dir.path());
        assert!(load_or_skip(&store, "mens").unwrap().is_none());
    }
}
