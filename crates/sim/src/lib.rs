pub mod aggregator;
pub mod error;
pub mod outcome;
pub mod simulator;
pub mod slots;
pub mod strength;

pub use aggregator::{simulate, OddsConfig, OddsReport, OddsSimulator};
pub use error::SimError;
pub use outcome::{draw_winner, win_probability, Side};
pub use simulator::{EventTally, TournamentSimulator};
pub use slots::SlotTable;
pub use strength::{composite_strength, EffectiveWeights, Signals, StrengthTable};
