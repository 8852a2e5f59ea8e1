pub mod bracket;
pub mod competitor;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod event;
pub mod result;
pub mod stats;
pub mod store;
pub mod validation;

pub use bracket::{BracketGraph, BracketNode, BracketPhase, ChampionshipConfig, MatchNode, Stage};
pub use competitor::{validate_competitors, Competitor, HeadToHead, UNRANKED_SEED};
pub use config::{AppConfig, DataConfig, SimulationConfig, StrengthWeights};
pub use config_loader::ConfigLoader;
pub use error::DataError;
pub use event::Event;
pub use result::{round5, ResultRecord};
pub use store::{Division, DivisionStore};
pub use validation::{validate_bracket, BracketIssue, BracketReport, Severity};
