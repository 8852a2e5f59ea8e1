//! Validate bracket CLI command.
//!
//! Runs the static bracket check for each division and exits non-zero when
//! any division has an authoring error.

use anyhow::{bail, Result};
use calcutta_core::{validate_bracket, BracketReport, Division, DivisionStore};
use clap::Args;
use serde::Serialize;

use super::{load_or_skip, DivisionArgs, OutputFormat};

/// Arguments for the validate command.
#[derive(Args, Debug, Clone)]
pub struct ValidateBracketArgs {
    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,

    #[command(flatten)]
    pub divisions: DivisionArgs,
}

/// Validation outcome of one division.
#[derive(Debug, Serialize)]
pub struct DivisionCheck {
    pub division: String,
    pub competitors: usize,
    pub qualifiers: usize,
    pub matches: usize,
    pub report: BracketReport,
}

impl DivisionCheck {
    pub fn run(division: &Division) -> Self {
        let bracket = &division.bracket;
        Self {
            division: division.name.clone(),
            competitors: division.competitors.len(),
            qualifiers: bracket.qualifier_count(),
            matches: bracket.phases().map(|p| p.root.match_count()).sum(),
            report: validate_bracket(bracket, &division.competitors),
        }
    }

    pub fn to_text(&self) -> String {
        let mut output = format!(
            "\n▸ {}: {} competitors, {} qualifiers, {} bracket matches\n",
            self.division.to_uppercase(),
            self.competitors,
            self.qualifiers,
            self.matches
        );
        if self.report.issues.is_empty() {
            output.push_str("  ✓ no issues\n");
            return output;
        }
        for issue in &self.report.issues {
            output.push_str(&format!("  {issue}\n"));
        }
        output.push_str(&format!(
            "  {} error(s), {} warning(s)\n",
            self.report.error_count(),
            self.report.warning_count()
        ));
        output
    }
}

/// Runs the validate command.
///
/// # Errors
/// Returns an error if a division cannot be loaded or any bracket has errors.
pub fn run_validate_bracket(args: ValidateBracketArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let config = args.divisions.load_config()?;
    let store = DivisionStore::new(&config.data.dir);

    let mut checks = Vec::new();
    for name in &config.data.divisions {
        if let Some(division) = load_or_skip(&store, name)? {
            checks.push(DivisionCheck::run(&division));
        }
    }

    match format {
        OutputFormat::Text => {
            for check in &checks {
                println!("{}", check.to_text());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&checks)?);
        }
    }

    let failed: Vec<&str> = checks
        .iter()
        .filter(|c| !c.report.is_valid())
        .map(|c| c.division.as_str())
        .collect();
    if !failed.is_empty() {
        bail!("Bracket errors in: {}", failed.join(", "));
    }

    tracing::info!(divisions = checks.len(), "All brackets valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcutta_core::{BracketGraph, BracketNode, ChampionshipConfig, Competitor};

    fn division(bracket: BracketGraph) -> Division {
        Division {
            name: "womens".to_string(),
            competitors: vec![Competitor::new("a", "A"), Competitor::new("b", "B")],
            bracket,
        }
    }

    fn bracket() -> BracketGraph {
        BracketGraph {
            a_event: vec![BracketNode::matchup_with_loser(
                BracketNode::team("a"),
                BracketNode::team("b"),
                "L1",
            )],
            b_event: vec![BracketNode::slot("L1")],
            championship: ChampionshipConfig::standard(2),
            c_event: None,
            d_event: None,
        }
    }

    #[test]
    fn clean_division_reports_no_issues() {
        let check = DivisionCheck::run(&division(bracket()));

        assert!(check.report.is_valid());
        assert_eq!(check.qualifiers, 2);
        assert_eq!(check.matches, 1);
        assert!(check.to_text().contains("no issues"));
    }

    #[test]
    fn broken_division_lists_issues() {
        let mut graph = bracket();
        graph.b_event[0] = BracketNode::slot("L7");

        let check = DivisionCheck::run(&division(graph));

        assert!(!check.report.is_valid());
        let text = check.to_text();
        assert!(text.contains("L7"));
        assert!(text.contains("error(s)"));
    }

    #[test]
    fn command_fails_on_invalid_bracket() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut graph = bracket();
        graph.a_event[0] = BracketNode::team("zz");
        let competitors = vec![Competitor::new("a", "A")];
        std::fs::write(
            dir.path().join("teams_womens.json"),
            serde_json::to_string(&competitors).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("bracket_womens.json"),
            serde_json::to_string(&graph).unwrap(),
        )
        .unwrap();

        let args = ValidateBracketArgs {
            format: "text".to_string(),
            divisions: DivisionArgs {
                divisions: vec!["womens".to_string()],
                data_dir: Some(dir.path().display().to_string()),
                config: Some(dir.path().join("absent.toml").display().to_string()),
            },
        };

        assert!(run_validate_bracket(args).is_err());
    }
}
