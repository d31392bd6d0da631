//! ludo-td CLI - Train and compare tabular TD agents on Ludo
//!
//! This CLI provides a unified interface for:
//! - Training one agent with a chosen update rule
//! - Comparing every update rule across player counts
//! - Inspecting saved agents and the reward table

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ludo-td")]
#[command(version, about = "Tabular TD learning for Ludo", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent against random opponents
    Train(Box<ludo_td::cli::commands::train::TrainArgs>),

    /// Compare update rules across player counts
    Compare(ludo_td::cli::commands::compare::CompareArgs),

    /// Inspect a saved agent
    Show(ludo_td::cli::commands::show::ShowArgs),

    /// Print the reward table
    Rewards(ludo_td::cli::commands::rewards::RewardsArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ludo_td::cli::init_tracing(cli.verbose);

    match cli.command {
        Commands::Train(args) => ludo_td::cli::commands::train::execute(*args),
        Commands::Compare(args) => ludo_td::cli::commands::compare::execute(args),
        Commands::Show(args) => ludo_td::cli::commands::show::execute(args),
        Commands::Rewards(args) => ludo_td::cli::commands::rewards::execute(args),
    }
}
