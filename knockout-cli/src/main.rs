//! KNOCKOUT CLI - Command-line interface
//!
//! Commands:
//! - next: derive the next schedulable round from entrants and history
//! - standings: print the current tournament standings
//! - simulate: play a whole tournament out with seeded random scores

mod input;
mod next_cmd;
mod simulate;
mod standings_cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "knockout")]
#[command(about = "Single-elimination tournament scheduler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the next round to schedule
    Next(next_cmd::NextArgs),
    /// Show current standings
    Standings(standings_cmd::StandingsArgs),
    /// Simulate a tournament to completion with random results
    Simulate(simulate::SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Next(args) => next_cmd::run(&args),
        Commands::Standings(args) => standings_cmd::run(&args),
        Commands::Simulate(args) => simulate::run(&args),
    }
}
