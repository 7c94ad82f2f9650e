//! Bracket arena - tree queries, result application and traversal
//!
//! The tree is stored as an arena of nodes addressed by index, with parent
//! back-references as plain indices. Depth, lock status and common ancestor
//! are computed by walking primary-parent links to the root. Traversals are
//! explicit-stack iterators so stack depth stays independent of tree size.

use rustc_hash::FxHashMap;

use crate::entrant::{EntrantId, Pairing};
use crate::error::BracketError;
use crate::node::{Decider, Node, NodeId, Outcome};

/// How to resolve a pairing in which both entrants scored the same.
///
/// The format itself does not define a tie-break, so the caller must choose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TiePolicy {
    /// Reject tied pairings as invalid input
    #[default]
    Reject,
    /// Award the win to the better-seeded entrant (lower rank number)
    HigherSeed,
}

/// A fully built single-elimination tree
#[derive(Clone, Debug)]
pub struct Bracket {
    nodes: Vec<Node>,
    root: NodeId,
    /// Entrant ids in rank order (rank 0 = top seed)
    seeding: Vec<EntrantId>,
    ranks: FxHashMap<EntrantId, usize>,
    leaves: FxHashMap<EntrantId, NodeId>,
}

impl Bracket {
    /// Assemble a bracket from a finished arena, verifying the single-root
    /// invariant.
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        seeding: Vec<EntrantId>,
        leaves: FxHashMap<EntrantId, NodeId>,
    ) -> Result<Self, BracketError> {
        let roots: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.primary_parent.is_none())
            .map(|(i, _)| i)
            .collect();

        if roots.len() != 1 {
            return Err(BracketError::MalformedTree(roots.len()));
        }

        let ranks = seeding
            .iter()
            .enumerate()
            .map(|(rank, &id)| (id, rank))
            .collect();

        Ok(Self {
            nodes,
            root: NodeId(roots[0]),
            seeding,
            ranks,
            leaves,
        })
    }

    // ========================================================================
    // Node access
    // ========================================================================

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node, failing fast when the id does not belong to this
    /// bracket.
    pub fn node(&self, id: NodeId) -> Result<&Node, BracketError> {
        self.nodes.get(id.0).ok_or(BracketError::DetachedNode(id))
    }

    /// Entrant ids in rank order
    pub fn seeding(&self) -> &[EntrantId] {
        &self.seeding
    }

    /// Seeding rank of an entrant, 0 = top seed
    pub fn rank_of(&self, entrant: EntrantId) -> Option<usize> {
        self.ranks.get(&entrant).copied()
    }

    /// Leaf node holding an entrant
    pub fn leaf_of(&self, entrant: EntrantId) -> Option<NodeId> {
        self.leaves.get(&entrant).copied()
    }

    // ========================================================================
    // Ancestry queries
    // ========================================================================

    /// Number of primary-parent hops to the root; the root is depth 0
    pub fn depth(&self, id: NodeId) -> Result<u32, BracketError> {
        self.node(id)?;
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].primary_parent {
            depth += 1;
            current = parent;
        }
        Ok(depth)
    }

    /// The unique ancestor with no primary parent
    pub fn common_ancestor(&self, id: NodeId) -> Result<NodeId, BracketError> {
        self.node(id)?;
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].primary_parent {
            current = parent;
        }
        Ok(current)
    }

    /// Lock status: a node reads as locked if it or any ancestor up to the
    /// root is locked. Locking a match therefore immutabilizes every match
    /// that feeds it.
    pub fn is_locked(&self, id: NodeId) -> Result<bool, BracketError> {
        self.node(id)?;
        Ok(self.locked_chain(id))
    }

    /// Set the local lock flag on a node. Result application does this
    /// automatically; byes are deliberately never locked here.
    pub fn lock(&mut self, id: NodeId) -> Result<(), BracketError> {
        self.node(id)?;
        self.nodes[id.0].locked = true;
        Ok(())
    }

    fn locked_chain(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if self.nodes[c.0].locked {
                return true;
            }
            current = self.nodes[c.0].primary_parent;
        }
        false
    }

    // ========================================================================
    // Decision state
    // ========================================================================

    /// Whether the slot's outcome is known.
    ///
    /// Leaves are always decided. A contest is decided once a result is
    /// recorded for it, or implicitly when exactly one child is a bye and
    /// the sibling is decided (auto-advance).
    pub fn is_decided(&self, id: NodeId) -> Result<bool, BracketError> {
        self.node(id)?;
        Ok(self.decided(id))
    }

    fn decided(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            match &self.nodes[current.0].decider {
                Decider::Entrant(_) | Decider::Bye => return true,
                Decider::Contest(c) => {
                    if c.outcome.is_some() {
                        return true;
                    }
                    match self.bye_sibling(c.child_a, c.child_b) {
                        Some(sibling) => current = sibling,
                        None => return false,
                    }
                }
            }
        }
    }

    /// The entrant advancing out of a slot, if decided. Byes advance nobody.
    pub fn winner_of(&self, id: NodeId) -> Result<Option<EntrantId>, BracketError> {
        self.node(id)?;
        Ok(self.winner(id))
    }

    fn winner(&self, id: NodeId) -> Option<EntrantId> {
        let mut current = id;
        loop {
            match &self.nodes[current.0].decider {
                Decider::Entrant(e) => return Some(*e),
                Decider::Bye => return None,
                Decider::Contest(c) => match c.outcome {
                    Some(o) => return Some(o.winner),
                    // Implicit bye case: the sibling's entrant advances
                    None => current = self.bye_sibling(c.child_a, c.child_b)?,
                },
            }
        }
    }

    /// The entrant eliminated at a slot. Leaves have no loser, and neither
    /// does a bye auto-advance since no pairing was ever recorded for it.
    pub fn loser_of(&self, id: NodeId) -> Result<Option<EntrantId>, BracketError> {
        let node = self.node(id)?;
        match &node.decider {
            Decider::Contest(c) => Ok(c.outcome.map(|o| o.loser)),
            _ => Ok(None),
        }
    }

    /// When exactly one of the two children is a bye leaf, the other child
    /// (the one whose winner auto-advances)
    fn bye_sibling(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let bye_a = matches!(self.nodes[a.0].decider, Decider::Bye);
        let bye_b = matches!(self.nodes[b.0].decider, Decider::Bye);
        match (bye_a, bye_b) {
            (true, false) => Some(b),
            (false, true) => Some(a),
            _ => None,
        }
    }

    // ========================================================================
    // Result application
    // ========================================================================

    /// Replay one historical pairing onto the tree.
    ///
    /// Searches in pre-order for the contest whose two decided child
    /// entrants are exactly the pairing's entrants (order-independent) and
    /// records winner and loser there, locking the node. Returns `Ok(false)`
    /// when no contest matches; that is not an error at this level, the
    /// caller decides severity. The tree is never mutated on failure.
    pub fn apply_pairing(
        &mut self,
        pairing: &Pairing,
        policy: TiePolicy,
    ) -> Result<bool, BracketError> {
        let Some((pa, pb)) = pairing.entrant_pair() else {
            return Ok(false);
        };

        let mut target = None;
        for id in self.preorder() {
            let Decider::Contest(c) = &self.nodes[id.0].decider else {
                continue;
            };
            if c.outcome.is_some() || self.locked_chain(id) {
                continue;
            }
            let (Some(wa), Some(wb)) = (self.winner(c.child_a), self.winner(c.child_b)) else {
                // Undecided child, or a bye slot that auto-resolves
                continue;
            };
            if (wa, wb) == (pa, pb) || (wa, wb) == (pb, pa) {
                target = Some(id);
                break;
            }
        }

        let Some(id) = target else {
            return Ok(false);
        };

        let outcome = self.resolve_outcome(pairing, policy)?;
        match &mut self.nodes[id.0].decider {
            Decider::Contest(c) => c.outcome = Some(outcome),
            _ => unreachable!("target node is always a contest"),
        }
        self.nodes[id.0].locked = true;
        tracing::debug!(
            "applied pairing {} vs {}: winner {}",
            pa,
            pb,
            outcome.winner
        );
        Ok(true)
    }

    /// Decide winner and loser from the pairing's scores
    fn resolve_outcome(
        &self,
        pairing: &Pairing,
        policy: TiePolicy,
    ) -> Result<Outcome, BracketError> {
        let a = &pairing.entries[0];
        let b = &pairing.entries[1];
        let score_a = a.score.ok_or(BracketError::MissingScore(a.entrant))?;
        let score_b = b.score.ok_or(BracketError::MissingScore(b.entrant))?;

        let a_wins = match score_a.cmp(&score_b) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => match policy {
                TiePolicy::Reject => {
                    return Err(BracketError::TiedPairing {
                        a: a.entrant,
                        b: b.entrant,
                        score: score_a,
                    })
                }
                TiePolicy::HigherSeed => {
                    let rank_a = self.rank_of(a.entrant).unwrap_or(usize::MAX);
                    let rank_b = self.rank_of(b.entrant).unwrap_or(usize::MAX);
                    rank_a < rank_b
                }
            },
        };

        Ok(if a_wins {
            Outcome {
                winner: a.entrant,
                loser: b.entrant,
                winner_score: score_a,
                loser_score: score_b,
            }
        } else {
            Outcome {
                winner: b.entrant,
                loser: a.entrant,
                winner_score: score_b,
                loser_score: score_a,
            }
        })
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Pre-order depth-first traversal of the whole tree
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            bracket: self,
            stack: vec![self.root],
        }
    }

    /// Pre-order traversal of the subtree rooted at `from`
    pub fn preorder_from(&self, from: NodeId) -> Result<Preorder<'_>, BracketError> {
        self.node(from)?;
        Ok(Preorder {
            bracket: self,
            stack: vec![from],
        })
    }

    /// Nodes satisfying a predicate, in pre-order
    pub fn find_nodes<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = NodeId> + 'a
    where
        P: Fn(&Node) -> bool + 'a,
    {
        self.preorder()
            .filter(move |&id| predicate(&self.nodes[id.0]))
    }

    /// Deciders satisfying a predicate, in pre-order
    pub fn find_deciders<'a, P>(
        &'a self,
        predicate: P,
    ) -> impl Iterator<Item = (NodeId, &'a Decider)> + 'a
    where
        P: Fn(&Decider) -> bool + 'a,
    {
        self.preorder().filter_map(move |id| {
            let decider = &self.nodes[id.0].decider;
            predicate(decider).then_some((id, decider))
        })
    }

    /// Pairings ready to be played, in pre-order.
    ///
    /// A contest is ready when both children are decided, its own outcome is
    /// not recorded, it is not locked (directly or via an ancestor), and it
    /// is not a bye slot. Bye slots auto-resolve and never appear here.
    pub fn find_undecided(&self) -> impl Iterator<Item = Pairing> + '_ {
        self.preorder().filter_map(move |id| {
            let c = self.nodes[id.0].decider.as_contest()?;
            if c.outcome.is_some() || self.locked_chain(id) {
                return None;
            }
            let wa = self.winner(c.child_a)?;
            let wb = self.winner(c.child_b)?;
            Some(Pairing::scheduled(wa, wb))
        })
    }
}

/// Explicit-stack pre-order iterator over node ids
pub struct Preorder<'a> {
    bracket: &'a Bracket,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Decider::Contest(c) = &self.bracket.nodes[id.0].decider {
            // Push B first so A is visited first
            self.stack.push(c.child_b);
            self.stack.push(c.child_a);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_bracket;
    use crate::entrant::Entrant;

    fn four_entrants() -> Vec<Entrant> {
        vec![
            Entrant::new(1, "A", Some(100)),
            Entrant::new(2, "B", Some(90)),
            Entrant::new(3, "C", Some(80)),
            Entrant::new(4, "D", Some(70)),
        ]
    }

    fn bracket_of_four() -> Bracket {
        build_bracket(&four_entrants()).unwrap().unwrap()
    }

    #[test]
    fn test_root_depth_zero() {
        let bracket = bracket_of_four();
        assert_eq!(bracket.depth(bracket.root()).unwrap(), 0);
    }

    #[test]
    fn test_common_ancestor_is_root() {
        let bracket = bracket_of_four();
        for id in bracket.preorder() {
            assert_eq!(bracket.common_ancestor(id).unwrap(), bracket.root());
        }
    }

    #[test]
    fn test_detached_node_query_fails() {
        let bracket = bracket_of_four();
        let bogus = NodeId(bracket.num_nodes() + 10);
        assert_eq!(bracket.depth(bogus), Err(BracketError::DetachedNode(bogus)));
        assert_eq!(
            bracket.is_locked(bogus),
            Err(BracketError::DetachedNode(bogus))
        );
        assert_eq!(
            bracket.common_ancestor(bogus),
            Err(BracketError::DetachedNode(bogus))
        );
    }

    #[test]
    fn test_lock_propagates_to_descendants() {
        let mut bracket = bracket_of_four();
        let root = bracket.root();
        bracket.lock(root).unwrap();

        for id in bracket.preorder().collect::<Vec<_>>() {
            assert!(bracket.is_locked(id).unwrap());
            // Descendants' own flags stay untouched
            if id != root {
                assert!(!bracket.node(id).unwrap().locked);
            }
        }
    }

    #[test]
    fn test_apply_unknown_pairing_returns_false() {
        let mut bracket = bracket_of_four();
        let before: Vec<Pairing> = bracket.find_undecided().collect();
        // A vs B is a second-round pairing; its children are not decided yet
        let pairing = Pairing::played(EntrantId(1), 2, EntrantId(2), 0);
        assert_eq!(bracket.apply_pairing(&pairing, TiePolicy::Reject), Ok(false));
        let after: Vec<Pairing> = bracket.find_undecided().collect();
        assert_eq!(before.len(), after.len());
    }

    #[test]
    fn test_apply_records_winner_and_locks() {
        let mut bracket = bracket_of_four();
        let pairing = Pairing::played(EntrantId(1), 2, EntrantId(3), 1);
        assert_eq!(bracket.apply_pairing(&pairing, TiePolicy::Reject), Ok(true));

        // The decided contest is locked and no longer schedulable
        let decided: Vec<_> = bracket
            .find_deciders(|d| matches!(d, Decider::Contest(c) if c.outcome.is_some()))
            .collect();
        assert_eq!(decided.len(), 1);
        let (id, decider) = decided[0];
        assert!(bracket.is_locked(id).unwrap());
        let outcome = decider.as_contest().unwrap().outcome.unwrap();
        assert_eq!(outcome.winner, EntrantId(1));
        assert_eq!(outcome.loser, EntrantId(3));
    }

    #[test]
    fn test_tied_pairing_rejected() {
        let mut bracket = bracket_of_four();
        let pairing = Pairing::played(EntrantId(1), 2, EntrantId(3), 2);
        assert_eq!(
            bracket.apply_pairing(&pairing, TiePolicy::Reject),
            Err(BracketError::TiedPairing {
                a: EntrantId(1),
                b: EntrantId(3),
                score: 2
            })
        );
        // Nothing mutated
        assert!(!bracket.is_decided(bracket.root()).unwrap());
    }

    #[test]
    fn test_tied_pairing_higher_seed_wins() {
        let mut bracket = bracket_of_four();
        let pairing = Pairing::played(EntrantId(3), 2, EntrantId(1), 2);
        assert_eq!(
            bracket.apply_pairing(&pairing, TiePolicy::HigherSeed),
            Ok(true)
        );
        let (_, decider) = bracket
            .find_deciders(|d| matches!(d, Decider::Contest(c) if c.outcome.is_some()))
            .next()
            .unwrap();
        // Entrant 1 is the top seed
        assert_eq!(decider.as_contest().unwrap().outcome.unwrap().winner, EntrantId(1));
    }

    #[test]
    fn test_find_undecided_is_restartable() {
        let bracket = bracket_of_four();
        let first: Vec<Pairing> = bracket.find_undecided().collect();
        let second: Vec<Pairing> = bracket.find_undecided().collect();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.entrant_pair(), b.entrant_pair());
        }
    }

    #[test]
    fn test_preorder_visits_every_node_once() {
        let bracket = bracket_of_four();
        let mut seen = vec![false; bracket.num_nodes()];
        for id in bracket.preorder() {
            assert!(!seen[id.index()]);
            seen[id.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
