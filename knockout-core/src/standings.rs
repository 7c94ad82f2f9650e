//! Standings summary derived from the tree
//!
//! The reference format left ranking as a declared-but-unbuilt feature, so
//! this is designed fresh: every entrant's rank follows from how deep into
//! the bracket it survives. The champion ranks 1, the runner-up 2, the
//! losers of the semi-finals 3, and so on; an entrant whose next match is
//! still pending carries the rank it would receive by losing that match.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::bracket::Bracket;
use crate::entrant::{Entrant, EntrantId};
use crate::error::BracketError;
use crate::node::NodeId;

/// One entrant's place in the tournament
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub entrant: EntrantId,
    pub name: String,
    /// 1 = champion; losers rank by the depth of the match they lost
    pub rank: u32,
    /// Depth of the contest where the entrant was eliminated (0 = final);
    /// `None` while the entrant is still competing or has won outright
    pub eliminated_at: Option<u32>,
}

impl Standing {
    pub fn is_eliminated(&self) -> bool {
        self.eliminated_at.is_some()
    }
}

/// Compute standings for all entrants, best rank first.
///
/// Ties in rank (entrants eliminated at the same depth) are ordered by
/// seeding. Requires a tree, hence at least two entrants.
pub fn standings(
    bracket: &Bracket,
    entrants: &[Entrant],
) -> Result<Vec<Standing>, BracketError> {
    if entrants.len() < 2 {
        return Err(BracketError::NotEnoughEntrants);
    }

    let names: FxHashMap<EntrantId, &str> =
        entrants.iter().map(|e| (e.id, e.name.as_str())).collect();

    let mut result = Vec::with_capacity(bracket.seeding().len());
    for &id in bracket.seeding() {
        // Seeding and leaf table are built together; every seeded entrant
        // has a leaf.
        let Some(leaf) = bracket.leaf_of(id) else {
            continue;
        };
        let (rank, eliminated_at) = place_entrant(bracket, id, leaf)?;
        result.push(Standing {
            entrant: id,
            name: names.get(&id).copied().unwrap_or_default().to_string(),
            rank,
            eliminated_at,
        });
    }

    // Stable sort keeps seeding order within equal ranks
    result.sort_by_key(|s| s.rank);
    Ok(result)
}

/// Rank a single entrant by climbing from its leaf to the highest slot it
/// has won into.
fn place_entrant(
    bracket: &Bracket,
    id: EntrantId,
    leaf: NodeId,
) -> Result<(u32, Option<u32>), BracketError> {
    // Highest node the entrant holds: bye slots are climbed through
    // automatically since their winner is the advancing sibling.
    let mut held = leaf;
    while let Some(parent) = bracket.node(held)?.primary_parent {
        if bracket.winner_of(parent)? == Some(id) {
            held = parent;
        } else {
            break;
        }
    }

    let Some(stall) = bracket.node(held)?.primary_parent else {
        // Holds the root: champion
        return Ok((1, None));
    };

    let depth = bracket.depth(stall)?;
    let eliminated = bracket.loser_of(stall)? == Some(id);
    Ok((depth + 2, eliminated.then_some(depth)))
}
