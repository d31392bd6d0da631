//! Rewards command - Print the reward table

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::output::{print_reward_table, print_section},
    rewards::{OutcomeCategory, RewardTable},
};

#[derive(Parser, Debug)]
#[command(about = "Print the reward of every outcome category")]
pub struct RewardsArgs {
    /// Print one `CATEGORY,REWARD` line per category instead of a grid
    #[arg(long, default_value_t = false)]
    pub flat: bool,
}

pub fn execute(args: RewardsArgs) -> Result<()> {
    let rewards = RewardTable::default();
    if args.flat {
        for (category, reward) in rewards.iter() {
            println!("{category},{reward}");
        }
        return Ok(());
    }

    print_section(&format!("Rewards ({} categories)", OutcomeCategory::COUNT));
    print_reward_table(&rewards);
    Ok(())
}
