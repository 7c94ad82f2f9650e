//! Historical result replay
//!
//! Replays an ordered list of completed rounds onto a built tree. Input is
//! validated before any mutation; a pairing that matches nothing in the
//! whole tree is a fatal corruption, never silently skipped.

use crate::bracket::{Bracket, TiePolicy};
use crate::entrant::Round;
use crate::error::BracketError;

/// Replay historical rounds onto the bracket.
///
/// Empty pairings are placeholders and are skipped. Every non-empty pairing
/// must land on exactly one contest; the first structural match in pre-order
/// wins. Pairings with more than two entries are rejected up front, before
/// anything is mutated.
pub fn replay(
    bracket: &mut Bracket,
    rounds: &[Round],
    policy: TiePolicy,
) -> Result<(), BracketError> {
    for round in rounds {
        for pairing in &round.pairings {
            if pairing.entries.len() > 2 {
                return Err(BracketError::OversizedPairing(pairing.entries.len()));
            }
        }
    }

    for (round_index, round) in rounds.iter().enumerate() {
        for pairing in &round.pairings {
            if pairing.is_empty() {
                continue;
            }

            let applied = bracket.apply_pairing(pairing, policy)?;
            if !applied {
                let ids = pairing.entries.iter().map(|e| e.entrant).collect();
                return Err(BracketError::CorruptHistory(ids));
            }
        }
        tracing::debug!(
            "replayed round {}: {} pairings",
            round_index + 1,
            round.pairings.len()
        );
    }

    Ok(())
}
