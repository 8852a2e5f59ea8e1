use std::collections::HashMap;

use crate::error::SimError;

/// Trial-scoped table of match losers, keyed by slot name.
///
/// Each slot is written exactly once per trial, by the match whose loser
/// destination names it, and may be read any number of times afterwards.
/// A fresh table is created for every trial and never shared.
#[derive(Debug, Default)]
pub struct SlotTable<'a> {
    filled: HashMap<&'a str, &'a str>,
}

impl<'a> SlotTable<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `competitor` as the occupant of `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::SlotAlreadyFilled`] if the slot was written earlier
    /// in this trial.
    pub fn publish(&mut self, slot: &'a str, competitor: &'a str) -> Result<(), SimError> {
        if self.filled.insert(slot, competitor).is_some() {
            return Err(SimError::SlotAlreadyFilled {
                slot: slot.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the competitor published to `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnresolvedSlot`] if no match has written the slot yet.
    pub fn resolve(&self, slot: &str) -> Result<&'a str, SimError> {
        self.filled
            .get(slot)
            .copied()
            .ok_or_else(|| SimError::UnresolvedSlot {
                slot: slot.to_string(),
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filled.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled.is_empty()
    }
}
