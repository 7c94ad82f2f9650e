//! Standings command - current placement of every entrant

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use knockout_core::{SingleElimination, Standing};

use crate::input::{self, TieArg};

#[derive(Args)]
pub struct StandingsArgs {
    /// Entrants JSON file
    #[arg(long, value_name = "FILE")]
    pub entrants: PathBuf,

    /// Historical rounds JSON file
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// How to resolve tied historical pairings
    #[arg(long, value_enum, default_value = "reject")]
    pub on_tie: TieArg,

    /// Output the standings as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &StandingsArgs) -> Result<()> {
    let entrants = input::load_entrants(&args.entrants)?;
    let history = match &args.history {
        Some(path) => input::load_history(path)?,
        None => Vec::new(),
    };

    let mut generator = SingleElimination::new(args.on_tie.into());
    generator
        .load_state(entrants, &history)
        .context("failed to load tournament state")?;

    let table = generator.standings()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    print_standings(&table);
    Ok(())
}

fn print_standings(table: &[Standing]) {
    println!("{:>4}  {:<24} STATUS", "RANK", "NAME");
    for standing in table {
        let status = match standing.eliminated_at {
            Some(0) => "eliminated in the final".to_string(),
            Some(depth) => format!("eliminated {} rounds from the final", depth),
            None if standing.rank == 1 => "champion".to_string(),
            None => "continuing".to_string(),
        };
        println!("{:>4}  {:<24} {}", standing.rank, standing.name, status);
    }
}
