//! Show strengths CLI command.
//!
//! Prints the signals feeding the strength model so weight choices can be
//! checked before a long simulation.

use anyhow::Result;
use calcutta_core::{Competitor, DivisionStore, StrengthWeights};
use calcutta_sim::{composite_strength, EffectiveWeights, Signals};
use clap::Args;
use serde::Serialize;

use super::{load_or_skip, DivisionArgs, OutputFormat, WeightArgs};

/// Arguments for the strengths command.
#[derive(Args, Debug, Clone)]
pub struct ShowStrengthsArgs {
    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,

    #[command(flatten)]
    pub divisions: DivisionArgs,

    #[command(flatten)]
    pub weights: WeightArgs,
}

/// One competitor's signals and composite strength.
#[derive(Debug, Clone, Serialize)]
pub struct StrengthRow {
    pub id: String,
    pub name: String,
    pub record: String,
    pub seed: u32,
    pub standings: f64,
    pub h2h: Option<f64>,
    pub seed_signal: f64,
    pub strength: f64,
}

impl StrengthRow {
    pub fn new(competitor: &Competitor, weights: &StrengthWeights) -> Self {
        let signals = Signals::for_competitor(competitor, weights);
        let effective = EffectiveWeights::for_competitor(competitor, weights);
        Self {
            id: competitor.id.clone(),
            name: competitor.name.clone(),
            record: format!(
                "{}-{}-{}",
                competitor.wins, competitor.losses, competitor.ties
            ),
            seed: competitor.seed,
            standings: signals.standings,
            h2h: (effective.h2h > 0.0).then_some(signals.h2h),
            seed_signal: signals.seed,
            strength: composite_strength(competitor, weights),
        }
    }
}

/// Rows for a division, strongest first.
pub fn strength_rows(competitors: &[Competitor], weights: &StrengthWeights) -> Vec<StrengthRow> {
    let mut rows: Vec<StrengthRow> = competitors
        .iter()
        .map(|c| StrengthRow::new(c, weights))
        .collect();
    rows.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    rows
}

fn format_rows(division: &str, rows: &[StrengthRow]) -> String {
    let mut output = format!("\n▸ {}\n\n", division.to_uppercase());
    output.push_str(&format!(
        "  {:<15} {:>8} {:>4} {:>9} {:>6} {:>6} {:>8}\n",
        "Team", "W-L-T", "Seed", "Standings", "H2H", "Seed", "Strength"
    ));
    for row in rows {
        let h2h = row
            .h2h
            .map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
        output.push_str(&format!(
            "  {:<15} {:>8} {:>4} {:>9.3} {:>6} {:>6.3} {:>8.3}\n",
            row.name, row.record, row.seed, row.standings, h2h, row.seed_signal, row.strength
        ));
    }
    output
}

/// Runs the strengths command.
///
/// # Errors
/// Returns an error if configuration or division files cannot be read.
pub fn run_show_strengths(args: ShowStrengthsArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let mut config = args.divisions.load_config()?;
    args.weights.apply(&mut config.weights)?;
    let store = DivisionStore::new(&config.data.dir);

    let mut divisions = Vec::new();
    for name in &config.data.divisions {
        if let Some(division) = load_or_skip(&store, name)? {
            divisions.push((name.clone(), strength_rows(&division.competitors, &config.weights)));
        }
    }

    match format {
        OutputFormat::Text => {
            for (name, rows) in &divisions {
                println!("{}", format_rows(name, rows));
            }
        }
        OutputFormat::Json => {
            let output: serde_json::Map<String, serde_json::Value> = divisions
                .into_iter()
                .map(|(name, rows)| Ok((name, serde_json::to_value(rows)?)))
                .collect::<Result<_, serde_json::Error>>()?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
