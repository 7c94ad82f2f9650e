//! Next command - derive the next schedulable round

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use knockout_core::{EntrantId, Round, SingleElimination};

use crate::input::{self, TieArg};

#[derive(Args)]
pub struct NextArgs {
    /// Entrants JSON file
    #[arg(long, value_name = "FILE")]
    pub entrants: PathBuf,

    /// Historical rounds JSON file (omit for a fresh tournament)
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Maximum number of pairings to schedule
    #[arg(long)]
    pub places: Option<usize>,

    /// How to resolve tied historical pairings
    #[arg(long, value_enum, default_value = "reject")]
    pub on_tie: TieArg,

    /// Output the round as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &NextArgs) -> Result<()> {
    let entrants = input::load_entrants(&args.entrants)?;
    let history = match &args.history {
        Some(path) => input::load_history(path)?,
        None => Vec::new(),
    };

    let names: HashMap<EntrantId, String> =
        entrants.iter().map(|e| (e.id, e.name.clone())).collect();

    let mut generator = SingleElimination::new(args.on_tie.into());
    generator
        .load_state(entrants, &history)
        .context("failed to load tournament state")?;

    let round = generator.create_next_round(args.places)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&round)?);
        return Ok(());
    }

    match round {
        None => println!("No round to schedule."),
        Some(round) => print_round(&round, &names),
    }
    Ok(())
}

fn print_round(round: &Round, names: &HashMap<EntrantId, String>) {
    println!("Next round ({} pairings):", round.len());
    for pairing in &round.pairings {
        if let Some((a, b)) = pairing.entrant_pair() {
            println!("  {} vs {}", display_name(names, a), display_name(names, b));
        }
    }
}

fn display_name(names: &HashMap<EntrantId, String>, id: EntrantId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}
