//! Bracket graph for a cross-linked single-elimination tournament.
//!
//! A division is described by named qualifying brackets for the primary (A)
//! and secondary (B) events, a combined championship seeding, and optional
//! lower-tier (C, D) brackets. Brackets are trees of [`BracketNode`]s; losers
//! of a match may be routed into a named slot that a later bracket reads.
//!
//! The JSON form is the one written by the bracket authoring tool:
//!
//! ```json
//! { "match": { "left": { "team": "williams" },
//!              "right": { "slot": "B14" },
//!              "loserSlot": "C2" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::event::Event;

/// One node of a bracket tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketNode {
    /// A known entrant, referenced by competitor id.
    #[serde(rename = "team")]
    Competitor(String),
    /// The loser published to this slot earlier in the same trial.
    #[serde(rename = "slot")]
    Slot(String),
    /// Two sub-nodes play; the winner advances.
    #[serde(rename = "match")]
    Match(Box<MatchNode>),
}

/// A match between the winners of two sub-nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchNode {
    pub left: BracketNode,
    pub right: BracketNode,
    /// Slot that receives the loser of this match.
    #[serde(rename = "loserSlot", default, skip_serializing_if = "Option::is_none")]
    pub loser_destination: Option<String>,
}

impl BracketNode {
    /// Leaf referencing a competitor directly.
    pub fn team(id: impl Into<String>) -> Self {
        Self::Competitor(id.into())
    }

    /// Leaf resolved from the trial's slot table.
    pub fn slot(name: impl Into<String>) -> Self {
        Self::Slot(name.into())
    }

    /// Match whose loser is eliminated.
    #[must_use]
    pub fn matchup(left: BracketNode, right: BracketNode) -> Self {
        Self::Match(Box::new(MatchNode {
            left,
            right,
            loser_destination: None,
        }))
    }

    /// Match whose loser is published to `slot`.
    #[must_use]
    pub fn matchup_with_loser(left: BracketNode, right: BracketNode, slot: impl Into<String>) -> Self {
        Self::Match(Box::new(MatchNode {
            left,
            right,
            loser_destination: Some(slot.into()),
        }))
    }

    /// Visits every node in evaluation order: left subtree, right subtree,
    /// then the match itself.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a BracketNode)) {
        if let BracketNode::Match(m) = self {
            m.left.walk(visit);
            m.right.walk(visit);
        }
        visit(self);
    }

    /// Competitor ids seated directly in this tree.
    #[must_use]
    pub fn competitor_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let BracketNode::Competitor(id) = node {
                out.push(id.as_str());
            }
        });
        out
    }

    /// Slots read by this tree, in evaluation order.
    #[must_use]
    pub fn consumed_slots(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let BracketNode::Slot(name) = node {
                out.push(name.as_str());
            }
        });
        out
    }

    /// Slots written by this tree, in evaluation order.
    #[must_use]
    pub fn produced_slots(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let BracketNode::Match(m) = node {
                if let Some(slot) = &m.loser_destination {
                    out.push(slot.as_str());
                }
            }
        });
        out
    }

    #[must_use]
    pub fn match_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            if matches!(node, BracketNode::Match(_)) {
                count += 1;
            }
        });
        count
    }
}

/// Seeding of the combined championship bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionshipConfig {
    /// Number of qualifiers seated, primary qualifiers first.
    #[serde(rename = "numQualifiers")]
    pub num_qualifiers: usize,
    /// Qualifier index pairs for the quarter round.
    #[serde(rename = "quarterSeed")]
    pub quarter_seed: Vec<[usize; 2]>,
    /// Quarter-round match index pairs for the semi round.
    #[serde(rename = "semiPairs")]
    pub semi_pairs: Vec<[usize; 2]>,
}

impl ChampionshipConfig {
    /// Standard seeding for `n` qualifiers: 1v n, 2 v n-1, ... with the
    /// quarter winners paired in order.
    #[must_use]
    pub fn standard(num_qualifiers: usize) -> Self {
        let quarter_seed: Vec<[usize; 2]> = (0..num_qualifiers / 2)
            .map(|i| [i, num_qualifiers - 1 - i])
            .collect();
        let semi_pairs = (0..quarter_seed.len() / 2)
            .map(|i| [2 * i, 2 * i + 1])
            .collect();
        Self {
            num_qualifiers,
            quarter_seed,
            semi_pairs,
        }
    }
}

/// Which part of the tournament a bracket tree belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Qualifying bracket of the primary event.
    Primary,
    /// Qualifying bracket of the secondary event, fed by primary losers.
    Secondary,
    /// Independent lower-tier bracket.
    LowerTier(Event),
}

/// A bracket tree together with its place in the evaluation order.
#[derive(Debug, Clone, Copy)]
pub struct BracketPhase<'a> {
    pub stage: Stage,
    /// Zero-based position within its stage.
    pub index: usize,
    pub root: &'a BracketNode,
}

impl BracketPhase<'_> {
    /// Short label such as `A-Q1`, `B-Q2` or `C`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.stage {
            Stage::Primary => format!("A-Q{}", self.index + 1),
            Stage::Secondary => format!("B-Q{}", self.index + 1),
            Stage::LowerTier(event) => event.to_string(),
        }
    }
}

/// Complete bracket topology of one division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketGraph {
    /// Primary-event qualifying brackets, in declaration order.
    pub a_event: Vec<BracketNode>,
    /// Secondary-event qualifying brackets, in declaration order.
    #[serde(default)]
    pub b_event: Vec<BracketNode>,
    pub championship: ChampionshipConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_event: Option<BracketNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_event: Option<BracketNode>,
}

impl BracketGraph {
    /// Number of qualifying brackets feeding the championship.
    #[must_use]
    pub fn qualifier_count(&self) -> usize {
        self.a_event.len() + self.b_event.len()
    }

    /// Qualifying brackets in evaluation order: every A bracket, then every B bracket.
    pub fn qualifying_phases(&self) -> impl Iterator<Item = BracketPhase<'_>> {
        let primary = self.a_event.iter().enumerate().map(|(index, root)| BracketPhase {
            stage: Stage::Primary,
            index,
            root,
        });
        let secondary = self.b_event.iter().enumerate().map(|(index, root)| BracketPhase {
            stage: Stage::Secondary,
            index,
            root,
        });
        primary.chain(secondary)
    }

    /// Lower-tier brackets in evaluation order (C, then D).
    pub fn lower_tier_phases(&self) -> impl Iterator<Item = BracketPhase<'_>> {
        [(Event::C, &self.c_event), (Event::D, &self.d_event)]
            .into_iter()
            .filter_map(|(event, tree)| {
                tree.as_ref().map(|root| BracketPhase {
                    stage: Stage::LowerTier(event),
                    index: 0,
                    root,
                })
            })
    }

    /// Every bracket tree in global evaluation order. The championship sits
    /// between the qualifying and lower-tier phases but reads no slots.
    pub fn phases(&self) -> impl Iterator<Item = BracketPhase<'_>> {
        self.qualifying_phases().chain(self.lower_tier_phases())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qualifier() -> BracketNode {
        BracketNode::matchup_with_loser(
            BracketNode::matchup_with_loser(
                BracketNode::team("williams"),
                BracketNode::team("patrick"),
                "L3",
            ),
            BracketNode::team("sheeran"),
            "L5",
        )
    }

    #[test]
    fn deserializes_authoring_format() {
        let json = r#"{
            "match": {
                "left": { "match": { "left": { "team": "a" }, "right": { "team": "b" }, "loserSlot": "L1" } },
                "right": { "slot": "B4" }
            }
        }"#;

        let node: BracketNode = serde_json::from_str(json).unwrap();

        let expected = BracketNode::matchup(
            BracketNode::matchup_with_loser(BracketNode::team("a"), BracketNode::team("b"), "L1"),
            BracketNode::slot("B4"),
        );
        assert_eq!(node, expected);
    }

    #[test]
    fn serializes_without_empty_loser_slot() {
        let node = BracketNode::matchup(BracketNode::team("a"), BracketNode::team("b"));
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(
            json,
            r#"{"match":{"left":{"team":"a"},"right":{"team":"b"}}}"#
        );
    }

    #[test]
    fn walk_visits_children_before_parent() {
        let tree = qualifier();
        assert_eq!(tree.produced_slots(), vec!["L3", "L5"]);
        assert_eq!(tree.competitor_ids(), vec!["williams", "patrick", "sheeran"]);
        assert_eq!(tree.match_count(), 2);
        assert!(tree.consumed_slots().is_empty());
    }

    #[test]
    fn consumed_slots_in_evaluation_order() {
        let tree = BracketNode::matchup(
            BracketNode::matchup(BracketNode::slot("C1"), BracketNode::slot("C2")),
            BracketNode::slot("C6"),
        );
        assert_eq!(tree.consumed_slots(), vec!["C1", "C2", "C6"]);
    }

    #[test]
    fn standard_championship_for_eight() {
        let config = ChampionshipConfig::standard(8);
        assert_eq!(config.quarter_seed, vec![[0, 7], [1, 6], [2, 5], [3, 4]]);
        assert_eq!(config.semi_pairs, vec![[0, 1], [2, 3]]);
    }

    #[test]
    fn standard_championship_for_four() {
        let config = ChampionshipConfig::standard(4);
        assert_eq!(config.quarter_seed, vec![[0, 3], [1, 2]]);
        assert_eq!(config.semi_pairs, vec![[0, 1]]);
    }

    #[test]
    fn phases_follow_global_order() {
        let graph = BracketGraph {
            a_event: vec![qualifier(), BracketNode::team("x")],
            b_event: vec![BracketNode::slot("L3")],
            championship: ChampionshipConfig::standard(2),
            c_event: None,
            d_event: Some(BracketNode::slot("L5")),
        };

        let labels: Vec<String> = graph.phases().map(|p| p.label()).collect();

        assert_eq!(labels, vec!["A-Q1", "A-Q2", "B-Q1", "D"]);
        assert_eq!(graph.qualifier_count(), 3);
    }

    #[test]
    fn graph_deserializes_without_lower_tiers() {
        let json = r#"{
            "a_event": [ { "team": "a" }, { "team": "b" } ],
            "championship": { "numQualifiers": 2, "quarterSeed": [[0, 1]], "semiPairs": [] }
        }"#;

        let graph: BracketGraph = serde_json::from_str(json).unwrap();

        assert!(graph.b_event.is_empty());
        assert!(graph.c_event.is_none());
        assert_eq!(graph.lower_tier_phases().count(), 0);
    }
}
