use thiserror::Error;

/// Errors raised while playing out a bracket graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A slot was read before any match in the current trial wrote it.
    #[error("slot '{slot}' not yet filled; bracket evaluation order error")]
    UnresolvedSlot { slot: String },

    /// A second match in the same trial tried to write an already-filled slot.
    #[error("slot '{slot}' written twice in one trial")]
    SlotAlreadyFilled { slot: String },

    /// A competitor node references an id missing from the division.
    #[error("unknown competitor '{id}'")]
    UnknownCompetitor { id: String },

    /// A championship pairing points past the entrants of its round.
    #[error("{round} index {index} out of range ({available} entrants)")]
    QualifierIndex {
        round: &'static str,
        index: usize,
        available: usize,
    },

    /// A championship round has no matches to play.
    #[error("{round} has no entrants")]
    EmptyRound { round: &'static str },
}

impl SimError {
    /// True for the ordering-error class: a slot consumed before it was produced.
    #[must_use]
    pub fn is_ordering_error(&self) -> bool {
        matches!(self, SimError::UnresolvedSlot { .. })
    }
}
