//! Error types for the bracket engine

use crate::entrant::{EntrantId, Score};
use crate::node::NodeId;
use thiserror::Error;

/// Failures reported by the bracket engine.
///
/// Everything here is deterministic and in-memory; nothing is retried
/// internally. Corruption and state-order errors must be surfaced to the
/// caller as hard failures that prevent further scheduling.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BracketError {
    /// A pairing carried more than two score entries, which single
    /// elimination cannot represent.
    #[error("pairing has {0} score entries; at most two teams may compete in a single-elimination pairing")]
    OversizedPairing(usize),

    /// A score entry in an applied pairing was missing its score.
    #[error("pairing entry for {0} has no recorded score")]
    MissingScore(EntrantId),

    /// A historical pairing did not correspond to any match in the tree.
    /// Fatal: replay must abort rather than silently drop results.
    #[error("historical pairing {0:?} does not match any pairing in the bracket; the tournament history is corrupt")]
    CorruptHistory(Vec<EntrantId>),

    /// Both entrants scored the same and the tie policy rejects ties.
    #[error("pairing between {a} and {b} is tied at {score}; ties are not allowed by the configured policy")]
    TiedPairing {
        a: EntrantId,
        b: EntrantId,
        score: Score,
    },

    /// The same entrant id appeared more than once in the entrant set.
    #[error("duplicate entrant id {0}")]
    DuplicateEntrant(EntrantId),

    /// Ancestry query on a node that is not part of the tree. This is a
    /// programming error, never recovered automatically.
    #[error("node {0:?} is not attached to this bracket")]
    DetachedNode(NodeId),

    /// The tree invariant of exactly one root was violated.
    #[error("bracket has {0} root nodes; expected exactly one")]
    MalformedTree(usize),

    /// The generator was asked for a round before a successful load.
    #[error("the generator was never successfully initialized with a valid tournament state")]
    NotInitialized,

    /// No pairing is ready to play, yet the tournament is not decided:
    /// a pairing from a previous round is still outstanding.
    #[error("no new round can be created: at least one pairing in a previous round is left to execute")]
    IncompleteRound,

    /// The operation needs at least two entrants.
    #[error("the tournament does not have enough entrants")]
    NotEnoughEntrants,
}
