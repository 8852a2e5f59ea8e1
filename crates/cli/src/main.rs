use clap::{Parser, Subcommand};

mod commands;

use commands::{CalculateOddsArgs, ShowStrengthsArgs, ValidateBracketArgs};

#[derive(Parser)]
#[command(name = "calcutta")]
#[command(about = "Calcutta auction odds via Monte Carlo bracket simulation", long_about = None)]
struct Cli {
    /// Optional log file path (logs to file instead of stderr)
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate each division and write odds_<division>.json
    Odds(CalculateOddsArgs),
    /// Check bracket files for authoring defects without simulating
    Validate(ValidateBracketArgs),
    /// Show each competitor's strength signals and composite strength
    Strengths(ShowStrengthsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    match cli.command {
        Commands::Odds(args) => commands::run_calculate_odds(args).await?,
        Commands::Validate(args) => commands::run_validate_bracket(args)?,
        Commands::Strengths(args) => commands::run_show_strengths(args)?,
    }

    Ok(())
}
