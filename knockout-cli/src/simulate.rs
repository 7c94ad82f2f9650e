//! Simulate command - play a tournament to completion with random scores
//!
//! Drives the same load / next-round lifecycle a real organizer would use,
//! feeding each scheduled round back in as history with randomly generated
//! scores. Deterministic for a fixed seed.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use knockout_core::{EntrantId, Pairing, Round, SingleElimination};

use crate::input::{self, TieArg};

#[derive(Args)]
pub struct SimulateArgs {
    /// Entrants JSON file
    #[arg(long, value_name = "FILE")]
    pub entrants: PathBuf,

    /// Random seed for reproducibility
    #[arg(long, default_value = "1337")]
    pub seed: u64,

    /// Winning score of every simulated match
    #[arg(long, default_value = "2")]
    pub goal: i64,

    /// How to resolve tied pairings
    #[arg(long, value_enum, default_value = "reject")]
    pub on_tie: TieArg,

    /// Output the final standings as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &SimulateArgs) -> Result<()> {
    let entrants = input::load_entrants(&args.entrants)?;
    let names: HashMap<EntrantId, String> =
        entrants.iter().map(|e| (e.id, e.name.clone())).collect();

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut generator = SingleElimination::new(args.on_tie.into());
    let mut history: Vec<Round> = Vec::new();

    generator
        .load_state(entrants.clone(), &history)
        .context("failed to load tournament state")?;

    let mut round_number = 0;
    while let Some(round) = generator.create_next_round(None)? {
        round_number += 1;
        if !args.json {
            println!("Round {}:", round_number);
        }

        let played = play_round(&round, args.goal, &mut rng, &names, args.json);
        history.push(played);
        generator.load_state(entrants.clone(), &history)?;
    }

    tracing::info!("simulated {} rounds with seed {}", round_number, args.seed);

    let table = generator.standings()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("\nFinal standings:");
    for standing in &table {
        println!("{:>4}. {}", standing.rank, standing.name);
    }
    Ok(())
}

/// Assign random scores to every scheduled pairing
fn play_round(
    round: &Round,
    goal: i64,
    rng: &mut ChaCha8Rng,
    names: &HashMap<EntrantId, String>,
    quiet: bool,
) -> Round {
    let mut played = Vec::with_capacity(round.len());
    for pairing in &round.pairings {
        let Some((a, b)) = pairing.entrant_pair() else {
            continue;
        };
        let (winner, loser) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
        let loser_score = rng.gen_range(0..goal.max(1));
        if !quiet {
            println!(
                "  {} beats {} {}-{}",
                name_of(names, winner),
                name_of(names, loser),
                goal,
                loser_score
            );
        }
        played.push(Pairing::played(winner, goal, loser, loser_score));
    }
    Round::new(played)
}

fn name_of(names: &HashMap<EntrantId, String>, id: EntrantId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}
