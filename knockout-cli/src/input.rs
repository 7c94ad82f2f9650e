//! Shared input loading and argument types

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use knockout_core::{Entrant, Round, TiePolicy};

/// Tie handling for historical results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TieArg {
    /// Reject tied pairings as invalid
    #[default]
    Reject,
    /// Award tied pairings to the better seed
    HigherSeed,
}

impl From<TieArg> for TiePolicy {
    fn from(arg: TieArg) -> Self {
        match arg {
            TieArg::Reject => TiePolicy::Reject,
            TieArg::HigherSeed => TiePolicy::HigherSeed,
        }
    }
}

/// Load the entrant set from a JSON file
pub fn load_entrants(path: &Path) -> Result<Vec<Entrant>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read entrants file {}", path.display()))?;
    let entrants: Vec<Entrant> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse entrants file {}", path.display()))?;
    Ok(entrants)
}

/// Load historical rounds from a JSON file
pub fn load_history(path: &Path) -> Result<Vec<Round>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history file {}", path.display()))?;
    let rounds: Vec<Round> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse history file {}", path.display()))?;
    Ok(rounds)
}
