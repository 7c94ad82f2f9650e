//! Entrant, pairing and round descriptors
//!
//! These are the in-memory types the engine consumes and produces. Entrants
//! are owned by the caller; the bracket itself only stores ids.

use serde::{Deserialize, Serialize};

/// Match score. Signed so penalty scoring schemes work unchanged.
pub type Score = i64;

/// Opaque entrant identity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntrantId(pub u64);

impl std::fmt::Display for EntrantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A competing party
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
    /// Seeding rating; entrants without one are ranked as if rated zero
    pub rating: Option<u32>,
}

impl Entrant {
    pub fn new(id: u64, name: impl Into<String>, rating: Option<u32>) -> Self {
        Self {
            id: EntrantId(id),
            name: name.into(),
            rating,
        }
    }
}

/// One entrant's entry in a pairing. A missing score means the match has
/// been scheduled but not played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub entrant: EntrantId,
    pub score: Option<Score>,
}

/// A single scheduled or completed match between two entrants.
///
/// Zero entries means a placeholder that was never played. Exactly two
/// entries with scores means a decided match. More than two entries is
/// invalid in a single-elimination tournament.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub entries: Vec<ScoreEntry>,
}

impl Pairing {
    /// A pairing scheduled for play, scores not yet known
    pub fn scheduled(a: EntrantId, b: EntrantId) -> Self {
        Self {
            entries: vec![
                ScoreEntry {
                    entrant: a,
                    score: None,
                },
                ScoreEntry {
                    entrant: b,
                    score: None,
                },
            ],
        }
    }

    /// A completed pairing with both scores recorded
    pub fn played(a: EntrantId, score_a: Score, b: EntrantId, score_b: Score) -> Self {
        Self {
            entries: vec![
                ScoreEntry {
                    entrant: a,
                    score: Some(score_a),
                },
                ScoreEntry {
                    entrant: b,
                    score: Some(score_b),
                },
            ],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the pairing carries two entries, both scored
    pub fn is_played(&self) -> bool {
        self.entries.len() == 2 && self.entries.iter().all(|e| e.score.is_some())
    }

    /// The two entrant ids, when the pairing has exactly two entries
    pub fn entrant_pair(&self) -> Option<(EntrantId, EntrantId)> {
        match self.entries.as_slice() {
            [a, b] => Some((a.entrant, b.entrant)),
            _ => None,
        }
    }
}

/// A batch of pairings played (or to be played) together
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub pairings: Vec<Pairing>,
}

impl Round {
    pub fn new(pairings: Vec<Pairing>) -> Self {
        Self { pairings }
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduled_pairing_is_not_played() {
        let p = Pairing::scheduled(EntrantId(1), EntrantId(2));
        assert!(!p.is_played());
        assert!(!p.is_empty());
        assert_eq!(p.entrant_pair(), Some((EntrantId(1), EntrantId(2))));
    }

    #[test]
    fn test_played_pairing() {
        let p = Pairing::played(EntrantId(1), 3, EntrantId(2), 1);
        assert!(p.is_played());
        assert_eq!(p.entrant_pair(), Some((EntrantId(1), EntrantId(2))));
    }

    #[test]
    fn test_empty_pairing_has_no_pair() {
        let p = Pairing::default();
        assert!(p.is_empty());
        assert!(!p.is_played());
        assert_eq!(p.entrant_pair(), None);
    }
}
