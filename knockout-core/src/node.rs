//! Bracket nodes and decision strategies
//!
//! A node is one slot in the bracket tree. Topology lives inside the
//! `Contest` decider, not in the node, so a single node type uniformly
//! represents leaf slots and internal match slots. Nodes reference each
//! other by arena index only; there are no owning pointers between nodes.

use crate::entrant::{EntrantId, Score};

/// Index of a node in the bracket arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Recorded result of a contest
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub winner: EntrantId,
    pub loser: EntrantId,
    pub winner_score: Score,
    pub loser_score: Score,
}

/// An internal match slot between two child nodes.
///
/// Undecided until a result is applied for it, except when exactly one
/// child is a bye: the other child's entrant then advances automatically
/// without a recorded pairing.
#[derive(Clone, Debug)]
pub struct Contest {
    pub child_a: NodeId,
    pub child_b: NodeId,
    pub outcome: Option<Outcome>,
}

/// Decision strategy for one bracket slot
#[derive(Clone, Debug)]
pub enum Decider {
    /// Leaf holding a seeded entrant; always decided, never a loser
    Entrant(EntrantId),
    /// Leaf representing a deliberately absent opponent
    Bye,
    /// Internal two-child match
    Contest(Contest),
}

impl Decider {
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Decider::Contest(_))
    }

    pub fn as_contest(&self) -> Option<&Contest> {
        match self {
            Decider::Contest(c) => Some(c),
            _ => None,
        }
    }
}

/// One slot in the bracket tree.
///
/// `primary_parent` is `None` only at the root. `secondary_parents` is part
/// of the shared node contract for future multi-bracket merges; single
/// elimination never populates it.
#[derive(Clone, Debug)]
pub struct Node {
    pub decider: Decider,
    pub primary_parent: Option<NodeId>,
    pub secondary_parents: Vec<NodeId>,
    /// Local lock flag. Observed lock status is this flag OR-ed across the
    /// whole primary-parent chain; see `Bracket::is_locked`.
    pub locked: bool,
}

impl Node {
    pub fn new(decider: Decider) -> Self {
        Self {
            decider,
            primary_parent: None,
            secondary_parents: Vec::new(),
            locked: false,
        }
    }

    /// Register a secondary parent, ignoring duplicates
    pub fn add_secondary_parent(&mut self, parent: NodeId) {
        if !self.secondary_parents.contains(&parent) {
            self.secondary_parents.push(parent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_parent_deduplicated() {
        let mut node = Node::new(Decider::Bye);
        node.add_secondary_parent(NodeId(3));
        node.add_secondary_parent(NodeId(3));
        node.add_secondary_parent(NodeId(5));
        assert_eq!(node.secondary_parents, vec![NodeId(3), NodeId(5)]);
    }

    #[test]
    fn test_leaf_classification() {
        assert!(Decider::Bye.is_leaf());
        assert!(Decider::Entrant(EntrantId(1)).is_leaf());
        let contest = Decider::Contest(Contest {
            child_a: NodeId(0),
            child_b: NodeId(1),
            outcome: None,
        });
        assert!(!contest.is_leaf());
        assert!(contest.as_contest().is_some());
    }
}
