//! Comparison of update rules across player counts
//!
//! Every rule is trained from scratch for every player count with the same
//! seed, so all agents face the same dice stream and opponents.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{
    players::TdPlayer,
    training::{TrainingConfig, TrainingPipeline, TrainingResult},
};
use crate::{Result, analysis::CurveSummary, app::AgentConfig, q_learning::UpdateRule};

/// Outcome of training one rule at one player count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub rule: UpdateRule,
    pub players: usize,
    pub episodes: usize,
    pub wins: usize,
    /// Statistics of the running win-rate curve, in percent
    pub win_rate: CurveSummary,
    /// Statistics of the per-episode cumulative reward
    pub reward: CurveSummary,
}

impl ComparisonEntry {
    fn from_result(rule: UpdateRule, result: &TrainingResult) -> Self {
        Self {
            rule,
            players: result.players,
            episodes: result.episodes,
            wins: result.wins,
            win_rate: result.win_rate_summary(),
            reward: result.reward_summary(),
        }
    }
}

/// All runs of a comparison
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub entries: Vec<ComparisonEntry>,
}

impl ComparisonResult {
    pub fn entry(&self, rule: UpdateRule, players: usize) -> Option<&ComparisonEntry> {
        self.entries
            .iter()
            .find(|entry| entry.rule == rule && entry.players == players)
    }

    /// Rule with the highest final win rate at `players`
    pub fn best_rule(&self, players: usize) -> Option<UpdateRule> {
        self.entries
            .iter()
            .filter(|entry| entry.players == players)
            .max_by(|a, b| a.win_rate.final_value.total_cmp(&b.win_rate.final_value))
            .map(|entry| entry.rule)
    }

    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Trains each configured rule at each player count
pub struct ComparisonFramework {
    rules: Vec<UpdateRule>,
    player_counts: Vec<usize>,
    agent: AgentConfig,
    training: TrainingConfig,
}

impl ComparisonFramework {
    /// Compare `rules` with agents built from `agent` and runs shaped by
    /// `training`; the player count of `training` is replaced per run.
    pub fn new(rules: Vec<UpdateRule>, agent: AgentConfig, training: TrainingConfig) -> Self {
        Self {
            rules,
            player_counts: vec![2, 3, 4],
            agent,
            training,
        }
    }

    pub fn with_player_counts(mut self, player_counts: Vec<usize>) -> Self {
        self.player_counts = player_counts;
        self
    }

    pub fn run(&self) -> Result<ComparisonResult> {
        let mut result = ComparisonResult::default();

        for &rule in &self.rules {
            for &players in &self.player_counts {
                let mut config = self.agent.clone();
                config.rule = rule;
                let mut player = TdPlayer::new(config.build()?, rule.name().to_string());

                let training = TrainingConfig {
                    players,
                    ..self.training.clone()
                };
                let run = TrainingPipeline::new(training).run(&mut player)?;
                let entry = ComparisonEntry::from_result(rule, &run);
                info!(
                    %rule,
                    players,
                    final_win_rate = entry.win_rate.final_value,
                    mean_win_rate = entry.win_rate.mean,
                    "comparison run finished"
                );
                result.entries.push(entry);
            }
        }

        Ok(result)
    }
}
