//! Bracket construction - seeded tree with bye padding
//!
//! Entrants are ranked descending by rating and placed with the masked-rank
//! merge rule: each new leaf of rank k pairs with the unique previously
//! placed leaf whose rank agrees with k under the current round mask. That
//! leaf is always rank `k & mask`, so a rank-indexed table replaces the
//! reference implementation's linear scans. The rule yields the canonical
//! seeding order: seed 1 meets seed 2 first, the {1,2} winner-slot meets the
//! {3,4} winner-slot next, and so on.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::bracket::Bracket;
use crate::entrant::{Entrant, EntrantId};
use crate::error::BracketError;
use crate::node::{Contest, Decider, Node, NodeId};

/// Build a seeded single-elimination tree.
///
/// Returns `Ok(None)` for fewer than two entrants: no matches are possible
/// and no tree exists. The bracket size is the smallest power of two >= the
/// entrant count; the gap is filled with bye leaves.
pub fn build_bracket(entrants: &[Entrant]) -> Result<Option<Bracket>, BracketError> {
    let mut seen = FxHashSet::default();
    for e in entrants {
        if !seen.insert(e.id) {
            return Err(BracketError::DuplicateEntrant(e.id));
        }
    }

    if entrants.len() < 2 {
        return Ok(None);
    }

    let seeding = rank_entrants(entrants);

    let mut nodes: Vec<Node> = Vec::new();
    let mut leaves: FxHashMap<EntrantId, NodeId> = FxHashMap::default();
    let mut leaf_by_rank: Vec<NodeId> = Vec::with_capacity(seeding.len());

    // Round counter: the mask doubles its reach at every power-of-two
    // boundary of the processed count.
    let mut next_round_at = 2usize;
    let mut mask = 0usize;

    for (rank, &id) in seeding.iter().enumerate() {
        if rank == next_round_at {
            next_round_at *= 2;
            mask = next_round_at / 2 - 1;
        }

        let leaf = push_node(&mut nodes, Decider::Entrant(id));
        leaves.insert(id, leaf);

        if rank > 0 {
            let partner = leaf_by_rank[rank & mask];
            make_siblings(&mut nodes, partner, leaf);
        }
        leaf_by_rank.push(leaf);
    }

    // Pad up to the bracket size with byes, using the same masked-rank rule.
    // Every bye lands opposite a real entrant's first-round slot.
    let size = next_round_at;
    for rank in seeding.len()..size {
        let leaf = push_node(&mut nodes, Decider::Bye);
        let partner = leaf_by_rank[rank & mask];
        make_siblings(&mut nodes, partner, leaf);
    }

    tracing::debug!(
        "built bracket: {} entrants, {} byes, {} nodes",
        seeding.len(),
        size - seeding.len(),
        nodes.len()
    );

    Bracket::from_parts(nodes, seeding, leaves).map(Some)
}

/// Rank descending by rating (missing rating counts as zero), ties broken by
/// stable input order; rank 0 is the top seed.
fn rank_entrants(entrants: &[Entrant]) -> Vec<EntrantId> {
    let mut order: Vec<&Entrant> = entrants.iter().collect();
    order.sort_by_key(|e| std::cmp::Reverse(e.rating.unwrap_or(0)));
    order.into_iter().map(|e| e.id).collect()
}

fn push_node(nodes: &mut Vec<Node>, decider: Decider) -> NodeId {
    let id = NodeId(nodes.len());
    nodes.push(Node::new(decider));
    id
}

/// Merge two nodes under a new contest, splicing the contest into the place
/// node `a` held under its old parent. `a`'s whole subtree descends one
/// level; `b` must be a fresh parentless leaf.
fn make_siblings(nodes: &mut Vec<Node>, a: NodeId, b: NodeId) -> NodeId {
    let old_parent = nodes[a.0].primary_parent;

    let parent = push_node(
        nodes,
        Decider::Contest(Contest {
            child_a: a,
            child_b: b,
            outcome: None,
        }),
    );
    nodes[parent.0].primary_parent = old_parent;
    nodes[a.0].primary_parent = Some(parent);
    nodes[b.0].primary_parent = Some(parent);

    if let Some(op) = old_parent {
        if let Decider::Contest(c) = &mut nodes[op.0].decider {
            if c.child_a == a {
                c.child_a = parent;
            } else if c.child_b == a {
                c.child_b = parent;
            }
        }
    }

    parent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::TiePolicy;
    use crate::entrant::Pairing;

    fn entrants(n: u64) -> Vec<Entrant> {
        (0..n)
            .map(|i| Entrant::new(i + 1, format!("team-{}", i + 1), Some(1000 - i as u32)))
            .collect()
    }

    fn count_leaves(bracket: &Bracket) -> (usize, usize) {
        let entrants = bracket
            .find_deciders(|d| matches!(d, Decider::Entrant(_)))
            .count();
        let byes = bracket
            .find_deciders(|d| matches!(d, Decider::Bye))
            .count();
        (entrants, byes)
    }

    #[test]
    fn test_no_tree_for_zero_or_one_entrant() {
        assert!(build_bracket(&[]).unwrap().is_none());
        assert!(build_bracket(&entrants(1)).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_entrant_rejected() {
        let mut list = entrants(3);
        list.push(Entrant::new(2, "dup", None));
        assert!(matches!(
            build_bracket(&list),
            Err(BracketError::DuplicateEntrant(EntrantId(2)))
        ));
    }

    #[test]
    fn test_leaf_and_bye_counts() {
        for n in 2..=17u64 {
            let bracket = build_bracket(&entrants(n)).unwrap().unwrap();
            let size = (n as usize).next_power_of_two();
            let (entrant_leaves, bye_leaves) = count_leaves(&bracket);
            assert_eq!(entrant_leaves, n as usize, "n={}", n);
            assert_eq!(bye_leaves, size - n as usize, "n={}", n);
            // A full binary tree over `size` leaves has size-1 contests
            assert_eq!(bracket.num_nodes(), 2 * size - 1, "n={}", n);
        }
    }

    #[test]
    fn test_contest_levels_match_bracket_size() {
        for n in [2u64, 4, 8, 16] {
            let bracket = build_bracket(&entrants(n)).unwrap().unwrap();
            let rounds = (n as usize).next_power_of_two().trailing_zeros();
            let max_contest_depth = bracket
                .find_deciders(|d| !d.is_leaf())
                .map(|(id, _)| bracket.depth(id).unwrap())
                .max()
                .unwrap();
            assert_eq!(max_contest_depth, rounds - 1, "n={}", n);
        }
    }

    #[test]
    fn test_top_two_seeds_meet_only_at_root() {
        for n in [2u64, 4, 8, 16, 32] {
            let bracket = build_bracket(&entrants(n)).unwrap().unwrap();
            let seed1 = bracket.seeding()[0];
            let seed2 = bracket.seeding()[1];

            // Climb from each leaf; the first shared ancestor must be the root
            let mut ancestors = std::collections::HashSet::new();
            let mut cursor = Some(bracket.leaf_of(seed1).unwrap());
            while let Some(id) = cursor {
                ancestors.insert(id);
                cursor = bracket.node(id).unwrap().primary_parent;
            }

            let mut meet = None;
            let mut cursor = Some(bracket.leaf_of(seed2).unwrap());
            while let Some(id) = cursor {
                if ancestors.contains(&id) {
                    meet = Some(id);
                    break;
                }
                cursor = bracket.node(id).unwrap().primary_parent;
            }

            assert_eq!(meet, Some(bracket.root()), "n={}", n);
        }
    }

    #[test]
    fn test_four_entrant_seeding_scenario() {
        // A(100), B(90), C(80), D(70): ranks A=0, B=1, C=2, D=3.
        // First round under the round-1 mask: A vs C and B vs D.
        let list = vec![
            Entrant::new(1, "A", Some(100)),
            Entrant::new(2, "B", Some(90)),
            Entrant::new(3, "C", Some(80)),
            Entrant::new(4, "D", Some(70)),
        ];
        let mut bracket = build_bracket(&list).unwrap().unwrap();

        let ready: Vec<_> = bracket
            .find_undecided()
            .map(|p| p.entrant_pair().unwrap())
            .collect();
        assert_eq!(ready, vec![(EntrantId(1), EntrantId(3)), (EntrantId(2), EntrantId(4))]);

        // Apply "A beats C" and "B beats D": the next round is exactly A vs B
        bracket
            .apply_pairing(&Pairing::played(EntrantId(1), 2, EntrantId(3), 0), TiePolicy::Reject)
            .unwrap();
        bracket
            .apply_pairing(&Pairing::played(EntrantId(2), 2, EntrantId(4), 1), TiePolicy::Reject)
            .unwrap();

        let ready: Vec<_> = bracket
            .find_undecided()
            .map(|p| p.entrant_pair().unwrap())
            .collect();
        assert_eq!(ready, vec![(EntrantId(1), EntrantId(2))]);
    }

    #[test]
    fn test_byes_auto_resolve_and_never_schedule() {
        // Six entrants: two byes, attached opposite the seeds the masked-rank
        // rule selects. Bye slots must not appear as schedulable pairings.
        let bracket = build_bracket(&entrants(6)).unwrap().unwrap();
        let ready: Vec<_> = bracket
            .find_undecided()
            .map(|p| p.entrant_pair().unwrap())
            .collect();
        assert_eq!(ready.len(), 2);
        for (a, b) in &ready {
            assert_ne!(a, b);
        }

        // Each bye slot already reads as decided, advancing the sibling
        for (id, _) in bracket.find_deciders(|d| matches!(d, Decider::Bye)) {
            let parent = bracket.node(id).unwrap().primary_parent.unwrap();
            assert!(bracket.is_decided(parent).unwrap());
            assert!(bracket.winner_of(parent).unwrap().is_some());
            assert!(bracket.loser_of(parent).unwrap().is_none());
        }
    }

    #[test]
    fn test_unrated_entrants_rank_last_in_input_order() {
        let list = vec![
            Entrant::new(1, "rated", Some(50)),
            Entrant::new(2, "first-unrated", None),
            Entrant::new(3, "second-unrated", None),
        ];
        let bracket = build_bracket(&list).unwrap().unwrap();
        assert_eq!(
            bracket.seeding(),
            &[EntrantId(1), EntrantId(2), EntrantId(3)]
        );
        assert_eq!(bracket.rank_of(EntrantId(3)), Some(2));
    }
}
