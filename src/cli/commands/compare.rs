//! Compare command - Train every update rule at several table sizes

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    cli::{
        config::LearningArgs,
        output::{format_number, print_kv, print_section, print_subsection},
    },
    export,
    pipeline::ComparisonFramework,
    q_learning::UpdateRule,
};

#[derive(Parser, Debug)]
#[command(about = "Compare update rules across player counts", allow_negative_numbers = true)]
pub struct CompareArgs {
    /// Update rules to compare (defaults to all four)
    #[arg(long, short = 'r', value_delimiter = ',')]
    pub rules: Vec<UpdateRule>,

    /// Player counts to train at
    #[arg(long, short = 'p', value_delimiter = ',', default_value = "2,3,4")]
    pub players: Vec<usize>,

    #[command(flatten)]
    pub learning: LearningArgs,

    /// Export comparison results to CSV
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Export comparison results to JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let rules = if args.rules.is_empty() {
        UpdateRule::ALL.to_vec()
    } else {
        args.rules.clone()
    };
    if args.players.is_empty() {
        return Err(anyhow!("Need at least one player count to compare"));
    }

    // the rule is replaced per run; validate the shared hyper-parameters once
    let agent = args.learning.agent_config(UpdateRule::QLearning);
    agent.validate().context("invalid agent configuration")?;

    print_section("Comparing update rules");
    print_kv(
        "Rules",
        &rules.iter().map(|r| r.label()).collect::<Vec<_>>().join(", "),
    );
    print_kv(
        "Player counts",
        &args
            .players
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    );
    print_kv("Episodes per run", &format_number(args.learning.episodes));

    let framework = ComparisonFramework::new(
        rules.clone(),
        agent,
        args.learning.training_config(args.players[0]),
    )
    .with_player_counts(args.players.clone());
    let result = framework.run().context("comparison failed")?;

    for &players in &args.players {
        print_subsection(&format!("{players} players"));
        println!(
            "  {:20} {:>10} {:>10} {:>10}",
            "Rule", "Final %", "Mean %", "Std"
        );
        for &rule in &rules {
            if let Some(entry) = result.entry(rule, players) {
                println!(
                    "  {:20} {:>10.2} {:>10.2} {:>10.2}",
                    rule.name(),
                    entry.win_rate.final_value,
                    entry.win_rate.mean,
                    entry.win_rate.std_dev
                );
            }
        }
        if let Some(best) = result.best_rule(players) {
            println!("  Best: {}", best.name());
        }
    }

    if let Some(path) = &args.output {
        export::write_comparison(path, &result)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nResults exported to: {}", path.display());
    }
    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}
