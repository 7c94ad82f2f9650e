//! KNOCKOUT Core - Single-elimination bracket engine
//!
//! This crate provides the core tournament logic for KNOCKOUT:
//! - Entrant, pairing and round descriptors
//! - Seeded bracket construction with bye padding
//! - Historical result replay with ancestor-based locking
//! - Next-round derivation and standings

pub mod entrant;
pub mod error;
pub mod node;
pub mod bracket;
pub mod builder;
pub mod replay;
pub mod generator;
pub mod standings;

// Re-exports for convenient access
pub use entrant::{Entrant, EntrantId, Pairing, Round, Score, ScoreEntry};
pub use error::BracketError;
pub use node::{Contest, Decider, Node, NodeId, Outcome};
pub use bracket::{Bracket, TiePolicy};
pub use builder::build_bracket;
pub use replay::replay;
pub use generator::{GeneratorState, SingleElimination};
pub use standings::{standings, Standing};
