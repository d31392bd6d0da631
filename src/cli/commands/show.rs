//! Show command - Inspect a saved agent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{print_kv, print_section, print_value_table},
    export,
    q_learning::SavedTdAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Inspect a saved agent")]
pub struct ShowArgs {
    /// Agent file written by `train --output`
    pub agent: PathBuf,

    /// Also export every table cell to CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub fn execute(args: ShowArgs) -> Result<()> {
    let saved = SavedTdAgent::load_from_file(&args.agent)?;
    let agent = saved.to_agent()?;
    let params = agent.params();

    print_section(&format!("{} agent", agent.rule().name()));
    print_kv("File", &args.agent.display().to_string());
    print_kv("Format version", &saved.version.to_string());
    print_kv("Episodes", &saved.metadata.episodes.to_string());
    print_kv("Players", &saved.metadata.players.to_string());
    print_kv("Wins", &saved.metadata.wins.to_string());
    print_kv("Learning rate", &params.learning_rate.to_string());
    print_kv("Discount", &params.discount.to_string());
    print_kv("Epsilon", &format!("{:.4}", agent.epsilon()));

    print_value_table("Q1", agent.q_table());
    if let Some(q2) = agent.q2_table() {
        print_value_table("Q2", q2);
    }

    if let Some(path) = &args.csv {
        export::write_value_table(path, &agent)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nValue table exported to: {}", path.display());
    }

    Ok(())
}
