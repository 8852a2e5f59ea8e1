//! Calculate odds CLI command.
//!
//! Simulates every configured division, writes `odds_<division>.json` for the
//! auction site and prints a summary table.

use anyhow::{bail, Context, Result};
use calcutta_core::stats::Z_95;
use calcutta_core::{validate_bracket, AppConfig, DivisionStore, Event};
use calcutta_sim::{OddsConfig, OddsReport, OddsSimulator};
use clap::Args;
use serde::Serialize;

use super::{load_or_skip, DivisionArgs, OutputFormat, WeightArgs};

/// Arguments for the odds command.
#[derive(Args, Debug, Clone)]
pub struct CalculateOddsArgs {
    /// Trials per division (default: from config, 50000)
    #[arg(short = 'n', long)]
    pub iterations: Option<usize>,

    /// Seed for reproducible results; division i uses seed + i
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,

    #[command(flatten)]
    pub divisions: DivisionArgs,

    #[command(flatten)]
    pub weights: WeightArgs,
}

impl CalculateOddsArgs {
    fn apply(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(n) = self.iterations {
            config.simulation.trials = n;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        self.weights.apply(&mut config.weights)
    }
}

/// Odds of one simulated division.
#[derive(Debug, Serialize)]
pub struct DivisionOdds {
    pub division: String,
    #[serde(flatten)]
    pub report: OddsReport,
}

impl DivisionOdds {
    /// Formats the result table, strongest championship odds first.
    pub fn to_text(&self) -> String {
        let records = &self.report.records;
        let mut order: Vec<usize> = (0..records.len()).collect();
        order.sort_by(|&i, &j| records[j].a.total_cmp(&records[i].a));

        let mut output = String::new();
        output.push_str(&format!(
            "\n▸ {} ({} trials)\n\n",
            self.division.to_uppercase(),
            self.report.n_trials
        ));
        output.push_str(&format!(
            "  {:<15} {:>7} {:>8} {:>7} {:>7} {:>7}  {:>15}\n",
            "Team", "Champ%", "Consol%", "C%", "D%", "Any%", "Champ 95% CI"
        ));
        output.push_str(&format!(
            "  {} {} {} {} {} {}  {}\n",
            "─".repeat(15),
            "─".repeat(7),
            "─".repeat(8),
            "─".repeat(7),
            "─".repeat(7),
            "─".repeat(7),
            "─".repeat(15)
        ));
        for &i in &order {
            let r = &records[i];
            let (lower, upper) = self.report.interval(i, Event::A, Z_95);
            output.push_str(&format!(
                "  {:<15} {:>6.1}% {:>7.1}% {:>6.1}% {:>6.1}% {:>6.1}%  {:>6.1}..{:>5.1}%\n",
                r.team_name,
                r.a * 100.0,
                r.b * 100.0,
                r.c * 100.0,
                r.d * 100.0,
                r.any * 100.0,
                lower * 100.0,
                upper * 100.0
            ));
        }
        for event in Event::ALL {
            let skipped = self.report.skipped(event);
            if skipped > 0 {
                output.push_str(&format!(
                    "\n  ⚠  {} skipped in {} of {} trials (unfilled slot)\n",
                    event.label(),
                    skipped,
                    self.report.n_trials
                ));
            }
        }
        output
    }
}

/// Runs the odds command.
///
/// # Errors
/// Returns an error if configuration or division files cannot be read, a
/// bracket is malformed, or the odds files cannot be written.
pub async fn run_calculate_odds(args: CalculateOddsArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let mut config = args.divisions.load_config()?;
    args.apply(&mut config)?;

    let store = DivisionStore::new(&config.data.dir);
    tracing::info!(
        trials = config.simulation.trials,
        seed = ?config.simulation.seed,
        divisions = ?config.data.divisions,
        "Calculating odds"
    );

    let mut divisions = Vec::new();
    let mut failed = Vec::new();
    for (index, name) in config.data.divisions.iter().enumerate() {
        let Some(division) = load_or_skip(&store, name)? else {
            continue;
        };

        let report = validate_bracket(&division.bracket, &division.competitors);
        for issue in report.warnings() {
            tracing::warn!(division = %name, "{issue}");
        }
        if let Some(first) = report.errors().next() {
            for issue in report.errors() {
                tracing::error!(division = %name, "{issue}");
            }
            failed.push(format!("{name} ({first})"));
            continue;
        }
        divisions.push((index, division));
    }
    if !failed.is_empty() {
        bail!("Bracket errors in: {}", failed.join(", "));
    }

    let mut tasks = Vec::with_capacity(divisions.len());
    for (index, division) in divisions {
        tracing::info!(
            division = %division.name,
            competitors = division.competitors.len(),
            a_qualifiers = division.bracket.a_event.len(),
            b_qualifiers = division.bracket.b_event.len(),
            "Running simulation"
        );

        let name = division.name.clone();
        let odds_config = division_config(&config, index);
        let task = tokio::task::spawn_blocking(move || {
            OddsSimulator::new(odds_config).simulate(&division.competitors, &division.bracket)
        });
        tasks.push((name, task));
    }

    let mut results = Vec::with_capacity(tasks.len());
    for (division, task) in tasks {
        let report = task
            .await
            .context("Simulation worker failed")?
            .with_context(|| format!("Simulation of division '{division}' failed"))?;
        let path = store
            .save_odds(&division, &report.records)
            .with_context(|| format!("Failed to write odds for '{division}'"))?;
        tracing::info!(division = %division, path = %path.display(), "Wrote odds");
        results.push(DivisionOdds { division, report });
    }

    match format {
        OutputFormat::Text => {
            for result in &results {
                println!("{}", result.to_text());
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({ "divisions": results });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Simulation settings for the division at `index`; a fixed seed is offset by
/// the index so divisions draw independent streams.
fn division_config(config: &AppConfig, index: usize) -> OddsConfig {
    let mut odds = OddsConfig::from_app_config(config);
    odds.seed = config
        .simulation
        .seed
        .map(|seed| seed.wrapping_add(index as u64));
    odds
}
