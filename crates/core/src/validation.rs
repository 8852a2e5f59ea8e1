//! Static validation of a division's bracket graph.
//!
//! Walks every bracket tree in the same global order the simulator uses and
//! reports authoring defects before any trial runs: references to unknown
//! competitors, slots that are read before they are written or written twice,
//! and championship seedings that point outside the qualifier list.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::bracket::{BracketGraph, BracketNode, BracketPhase, Stage};
use crate::competitor::Competitor;

/// How serious a bracket issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// The simulation would abort or produce meaningless results.
    Error,
    /// The simulation runs, but some outcome is skipped or unused.
    Warning,
}

/// A single finding of the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketIssue {
    pub severity: Severity,
    /// Phase label (`A-Q1`, `B-Q2`, `C`, `championship`).
    pub phase: String,
    pub message: String,
}

impl fmt::Display for BracketIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level} [{}]: {}", self.phase, self.message)
    }
}

/// Outcome of validating one division.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BracketReport {
    pub issues: Vec<BracketIssue>,
}

impl BracketReport {
    /// True when no issue is an error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &BracketIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &BracketIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    fn push(&mut self, severity: Severity, phase: &str, message: String) {
        self.issues.push(BracketIssue {
            severity,
            phase: phase.to_string(),
            message,
        });
    }
}

/// Tracks slot writes, slot reads and competitor seatings across phases.
struct Walker<'a> {
    known: HashSet<&'a str>,
    seated: HashMap<&'a str, String>,
    written: HashMap<&'a str, String>,
    read: HashSet<&'a str>,
    report: BracketReport,
}

impl<'a> Walker<'a> {
    fn new(competitors: &'a [Competitor]) -> Self {
        Self {
            known: competitors.iter().map(|c| c.id.as_str()).collect(),
            seated: HashMap::new(),
            written: HashMap::new(),
            read: HashSet::new(),
            report: BracketReport::default(),
        }
    }

    fn visit_phase(&mut self, phase: BracketPhase<'a>) {
        let label = phase.label();
        // A lower-tier bracket with an unfilled slot only loses that event.
        let unresolved = match phase.stage {
            Stage::LowerTier(_) => Severity::Warning,
            Stage::Primary | Stage::Secondary => Severity::Error,
        };

        let mut nodes = Vec::new();
        phase.root.walk(&mut |node| nodes.push(node));

        for node in nodes {
            match node {
                BracketNode::Competitor(id) => self.visit_competitor(id, &label),
                BracketNode::Slot(name) => {
                    if !self.written.contains_key(name.as_str()) {
                        let message = match unresolved {
                            Severity::Error => {
                                format!("slot '{name}' is read before any match writes it")
                            }
                            Severity::Warning => format!(
                                "slot '{name}' is never filled; event {label} will be skipped"
                            ),
                        };
                        self.report.push(unresolved, &label, message);
                    }
                    self.read.insert(name.as_str());
                }
                BracketNode::Match(m) => {
                    if let Some(slot) = &m.loser_destination {
                        if let Some(previous) = self.written.get(slot.as_str()) {
                            let message =
                                format!("slot '{slot}' is already written by a match in {previous}");
                            self.report.push(Severity::Error, &label, message);
                        } else {
                            self.written.insert(slot.as_str(), label.clone());
                        }
                    }
                }
            }
        }
    }

    fn visit_competitor(&mut self, id: &'a str, label: &str) {
        if !self.known.contains(id) {
            self.report
                .push(Severity::Error, label, format!("unknown competitor '{id}'"));
        }
        if let Some(previous) = self.seated.get(id) {
            let message = format!("competitor '{id}' is already seated in {previous}");
            self.report.push(Severity::Error, label, message);
        } else {
            self.seated.insert(id, label.to_string());
        }
    }

    fn finish(mut self) -> BracketReport {
        let mut unread: Vec<(&str, &String)> = self
            .written
            .iter()
            .filter(|(slot, _)| !self.read.contains(*slot))
            .map(|(slot, phase)| (*slot, phase))
            .collect();
        unread.sort();
        for (slot, phase) in unread {
            self.report.push(
                Severity::Warning,
                phase,
                format!("loser slot '{slot}' is written but never read"),
            );
        }
        self.report
    }
}

fn validate_championship(graph: &BracketGraph, report: &mut BracketReport) {
    const PHASE: &str = "championship";
    let config = &graph.championship;
    let available = graph.qualifier_count();

    if config.num_qualifiers != available {
        report.push(
            Severity::Error,
            PHASE,
            format!(
                "numQualifiers is {} but the graph declares {available} qualifying brackets",
                config.num_qualifiers
            ),
        );
    }
    if config.quarter_seed.is_empty() {
        report.push(Severity::Error, PHASE, "no quarter-round pairings".to_string());
        return;
    }

    let mut seeded = HashSet::new();
    for pair in &config.quarter_seed {
        for &index in pair {
            if index >= available {
                report.push(
                    Severity::Error,
                    PHASE,
                    format!("quarter seed index {index} out of range (0..{available})"),
                );
            } else if !seeded.insert(index) {
                report.push(
                    Severity::Error,
                    PHASE,
                    format!("qualifier {index} is seeded into more than one quarter match"),
                );
            }
        }
    }
    for index in (0..available).filter(|i| !seeded.contains(i)) {
        report.push(
            Severity::Warning,
            PHASE,
            format!("qualifier {index} is never seeded into the championship"),
        );
    }

    let quarters = config.quarter_seed.len();
    let mut paired = HashSet::new();
    for pair in &config.semi_pairs {
        for &index in pair {
            if index >= quarters {
                report.push(
                    Severity::Error,
                    PHASE,
                    format!("semi pair index {index} out of range (0..{quarters})"),
                );
            } else if !paired.insert(index) {
                report.push(
                    Severity::Error,
                    PHASE,
                    format!("quarter match {index} feeds more than one semi"),
                );
            }
        }
    }
    if !config.semi_pairs.is_empty() {
        for index in (0..quarters).filter(|i| !paired.contains(i)) {
            report.push(
                Severity::Warning,
                PHASE,
                format!("winner of quarter match {index} never plays a semi"),
            );
        }
    }
}

/// Validates a division's bracket graph against its competitor list.
///
/// The walk follows the simulator's order (A brackets, B brackets,
/// championship, C, D), so a slot reported as read-before-written here is
/// exactly a slot the simulator would fail to resolve.
#[must_use]
pub fn validate_bracket(graph: &BracketGraph, competitors: &[Competitor]) -> BracketReport {
    let mut walker = Walker::new(competitors);
    for phase in graph.qualifying_phases() {
        walker.visit_phase(phase);
    }
    validate_championship(graph, &mut walker.report);
    for phase in graph.lower_tier_phases() {
        walker.visit_phase(phase);
    }
    walker.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::ChampionshipConfig;

    fn competitors(ids: &[&str]) -> Vec<Competitor> {
        ids.iter().map(|id| Competitor::new(*id, id.to_uppercase())).collect()
    }

    /// Two four-team A qualifiers whose losers feed two B qualifiers.
    fn well_formed() -> BracketGraph {
        let q = |a: &str, b: &str, c: &str, d: &str, tag: &str| {
            BracketNode::matchup_with_loser(
                BracketNode::matchup_with_loser(
                    BracketNode::team(a),
                    BracketNode::team(b),
                    format!("{tag}1"),
                ),
                BracketNode::matchup_with_loser(
                    BracketNode::team(c),
                    BracketNode::team(d),
                    format!("{tag}2"),
                ),
                format!("{tag}3"),
            )
        };
        BracketGraph {
            a_event: vec![q("a", "b", "c", "d", "L"), q("e", "f", "g", "h", "M")],
            b_event: vec![
                BracketNode::matchup_with_loser(
                    BracketNode::matchup_with_loser(
                        BracketNode::slot("L1"),
                        BracketNode::slot("M2"),
                        "C1",
                    ),
                    BracketNode::slot("M3"),
                    "D1",
                ),
                BracketNode::matchup_with_loser(
                    BracketNode::matchup_with_loser(
                        BracketNode::slot("M1"),
                        BracketNode::slot("L2"),
                        "C2",
                    ),
                    BracketNode::slot("L3"),
                    "D2",
                ),
            ],
            championship: ChampionshipConfig::standard(4),
            c_event: Some(BracketNode::matchup(
                BracketNode::slot("C1"),
                BracketNode::slot("C2"),
            )),
            d_event: Some(BracketNode::matchup(
                BracketNode::slot("D1"),
                BracketNode::slot("D2"),
            )),
        }
    }

    fn ids() -> Vec<Competitor> {
        competitors(&["a", "b", "c", "d", "e", "f", "g", "h"])
    }

    #[test]
    fn well_formed_graph_has_no_issues() {
        let report = validate_bracket(&well_formed(), &ids());
        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert!(report.is_valid());
    }

    #[test]
    fn unknown_competitor_is_an_error() {
        let report = validate_bracket(&well_formed(), &competitors(&["a", "b", "c"]));

        assert!(!report.is_valid());
        assert!(report
            .errors()
            .any(|i| i.message.contains("unknown competitor 'h'")));
    }

    #[test]
    fn competitor_seated_twice_is_an_error() {
        let mut graph = well_formed();
        graph.a_event[1] = BracketNode::matchup(BracketNode::team("a"), BracketNode::team("e"));

        let report = validate_bracket(&graph, &ids());

        assert!(report
            .errors()
            .any(|i| i.phase == "A-Q2" && i.message.contains("already seated in A-Q1")));
    }

    #[test]
    fn slot_read_before_written_is_an_error_in_qualifying() {
        let mut graph = well_formed();
        graph.a_event.swap(0, 1);
        graph.a_event[0] = BracketNode::matchup(BracketNode::slot("C1"), BracketNode::team("e"));

        let report = validate_bracket(&graph, &ids());

        assert!(report
            .errors()
            .any(|i| i.phase == "A-Q1" && i.message.contains("slot 'C1'")));
    }

    #[test]
    fn unfilled_lower_tier_slot_is_a_warning() {
        let mut graph = well_formed();
        graph.d_event = Some(BracketNode::matchup(
            BracketNode::slot("D1"),
            BracketNode::slot("D9"),
        ));

        let report = validate_bracket(&graph, &ids());

        assert!(report.is_valid());
        assert!(report
            .warnings()
            .any(|i| i.phase == "D" && i.message.contains("'D9' is never filled")));
        assert!(report
            .warnings()
            .any(|i| i.message.contains("'D2' is written but never read")));
    }

    #[test]
    fn slot_written_twice_is_an_error() {
        let mut graph = well_formed();
        graph.c_event = Some(BracketNode::matchup_with_loser(
            BracketNode::slot("C1"),
            BracketNode::slot("C2"),
            "D1",
        ));

        let report = validate_bracket(&graph, &ids());

        assert!(report
            .errors()
            .any(|i| i.phase == "C" && i.message.contains("already written by a match in B-Q1")));
    }

    #[test]
    fn championship_count_mismatch_is_an_error() {
        let mut graph = well_formed();
        graph.championship = ChampionshipConfig::standard(8);

        let report = validate_bracket(&graph, &ids());

        assert!(report
            .errors()
            .any(|i| i.phase == "championship" && i.message.contains("numQualifiers is 8")));
        assert!(report
            .errors()
            .any(|i| i.message.contains("quarter seed index 7 out of range")));
    }

    #[test]
    fn championship_bad_semi_index_is_an_error() {
        let mut graph = well_formed();
        graph.championship.semi_pairs = vec![[0, 2]];

        let report = validate_bracket(&graph, &ids());

        assert!(report
            .errors()
            .any(|i| i.message.contains("semi pair index 2 out of range")));
    }

    #[test]
    fn issue_display_includes_phase() {
        let issue = BracketIssue {
            severity: Severity::Warning,
            phase: "C".to_string(),
            message: "slot 'C9' is never filled".to_string(),
        };
        assert_eq!(issue.to_string(), "warning [C]: slot 'C9' is never filled");
    }
}
