//! Shared configuration types for CLI commands

use clap::Args;

use crate::{
    app::AgentConfig,
    pipeline::TrainingConfig,
    q_learning::{ExplorationSchedule, UpdateRule},
};

/// Hyper-parameters shared by `train` and `compare`
#[derive(Args, Debug, Clone)]
pub struct LearningArgs {
    /// Number of training episodes (games)
    #[arg(long, short = 'e', default_value_t = 1000)]
    pub episodes: usize,

    /// Learning rate α
    #[arg(long, default_value_t = 0.2)]
    pub learning_rate: f64,

    /// Discount factor γ
    #[arg(long, default_value_t = 0.5)]
    pub discount: f64,

    /// Initial exploration rate ε
    #[arg(long, default_value_t = 0.9)]
    pub epsilon: f64,

    /// Exponential decay constant of ε per episode
    #[arg(long, default_value_t = 0.05)]
    pub epsilon_decay: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl LearningArgs {
    pub fn agent_config(&self, rule: UpdateRule) -> AgentConfig {
        let config = AgentConfig::new(rule)
            .with_learning_rate(self.learning_rate)
            .with_discount(self.discount)
            .with_epsilon(self.epsilon);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    pub fn training_config(&self, players: usize) -> TrainingConfig {
        TrainingConfig {
            episodes: self.episodes,
            players,
            seed: self.seed,
            exploration: ExplorationSchedule::new(self.epsilon, self.epsilon_decay),
        }
    }
}
