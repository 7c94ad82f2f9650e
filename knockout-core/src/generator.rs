//! Pairings generator - tournament lifecycle and next-round derivation
//!
//! `SingleElimination` wraps the tree behind the load / create-next-round
//! lifecycle: load builds the bracket and replays history, and next-round
//! derivation scans the tree for matches whose opponents are known but whose
//! outcome is not yet recorded.

use crate::bracket::{Bracket, TiePolicy};
use crate::builder::build_bracket;
use crate::entrant::{Entrant, Round};
use crate::error::BracketError;
use crate::replay::replay;
use crate::standings::{standings, Standing};

/// Lifecycle state of the generator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GeneratorState {
    #[default]
    NotInitialized,
    Initialized,
}

/// Single-elimination pairings generator.
///
/// Late entry is not supported: changing the entrant set means discarding
/// the tree and loading again from scratch.
#[derive(Clone, Debug, Default)]
pub struct SingleElimination {
    /// None when there are fewer than two entrants (no matches possible)
    bracket: Option<Bracket>,
    entrants: Vec<Entrant>,
    state: GeneratorState,
    tie_policy: TiePolicy,
}

impl SingleElimination {
    pub fn new(tie_policy: TiePolicy) -> Self {
        Self {
            tie_policy,
            ..Self::default()
        }
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// The loaded tree, when one exists
    pub fn bracket(&self) -> Option<&Bracket> {
        self.bracket.as_ref()
    }

    /// Discard all loaded state
    pub fn reset(&mut self) {
        self.bracket = None;
        self.entrants.clear();
        self.state = GeneratorState::NotInitialized;
    }

    /// Build the tree from the entrant set and replay historical rounds
    /// onto it. On failure the generator keeps its previous state.
    pub fn load_state(
        &mut self,
        entrants: Vec<Entrant>,
        rounds: &[Round],
    ) -> Result<(), BracketError> {
        let mut bracket = build_bracket(&entrants)?;
        match bracket.as_mut() {
            Some(b) => replay(b, rounds, self.tie_policy)?,
            // No tree exists, so no historical pairing can match anything;
            // a non-empty history here is corrupt, not ignorable.
            None => {
                for round in rounds {
                    if let Some(p) = round.pairings.iter().find(|p| !p.is_empty()) {
                        let ids = p.entries.iter().map(|e| e.entrant).collect();
                        return Err(BracketError::CorruptHistory(ids));
                    }
                }
            }
        }

        tracing::info!(
            "loaded tournament state: {} entrants, {} historical rounds",
            entrants.len(),
            rounds.len()
        );
        self.bracket = bracket;
        self.entrants = entrants;
        self.state = GeneratorState::Initialized;
        Ok(())
    }

    /// Derive the next schedulable round.
    ///
    /// `places` optionally caps the number of pairings, taken in traversal
    /// order. Returns `Ok(None)` when there is no tree (fewer than two
    /// entrants) or when the tournament is complete. Calling this twice
    /// without applying results yields the same round both times.
    pub fn create_next_round(&self, places: Option<usize>) -> Result<Option<Round>, BracketError> {
        if self.state != GeneratorState::Initialized {
            return Err(BracketError::NotInitialized);
        }

        let Some(bracket) = &self.bracket else {
            return Ok(None);
        };

        let ready: Vec<_> = bracket.find_undecided().collect();

        if ready.is_empty() {
            if bracket.is_decided(bracket.root())? {
                // Tournament complete
                return Ok(None);
            }
            // An earlier round is still outstanding: nothing is ready, yet
            // the champion is unknown. Scheduling must stop here.
            return Err(BracketError::IncompleteRound);
        }

        // The cap applies after the emptiness check, so a zero cap on a live
        // tournament yields an empty round rather than an error.
        let ready = match places {
            Some(limit) => ready.into_iter().take(limit).collect(),
            None => ready,
        };

        Ok(Some(Round::new(ready)))
    }

    /// Current standings of all entrants
    pub fn standings(&self) -> Result<Vec<Standing>, BracketError> {
        if self.state != GeneratorState::Initialized {
            return Err(BracketError::NotInitialized);
        }
        let Some(bracket) = &self.bracket else {
            return Err(BracketError::NotEnoughEntrants);
        };
        standings(bracket, &self.entrants)
    }
}
