//! Configuration types for agent creation.

use crate::{
    Error, Result,
    ludo::StateSpace,
    q_learning::{LearningParameters, TdAgent, UpdateRule},
    rewards::RewardTable,
};

/// Configuration for creating a [`TdAgent`].
///
/// # Examples
///
/// ```
/// use ludo_td::app::AgentConfig;
/// use ludo_td::q_learning::UpdateRule;
///
/// let agent = AgentConfig::new(UpdateRule::Sarsa)
///     .with_learning_rate(0.1)
///     .with_epsilon(0.5)
///     .with_seed(42)
///     .build()?;
/// assert_eq!(agent.epsilon(), 0.5);
/// # Ok::<(), ludo_td::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Update equation
    pub rule: UpdateRule,
    /// α and γ
    pub params: LearningParameters,
    /// Initial exploration rate
    pub epsilon: f64,
    pub rewards: RewardTable,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a configuration for `rule` with the default hyper-parameters:
    /// α = 0.2, γ = 0.5, ε = 0.9 and one row per piece state.
    pub fn new(rule: UpdateRule) -> Self {
        Self {
            rule,
            params: LearningParameters::default(),
            epsilon: 0.9,
            rewards: RewardTable::default(),
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.params.learning_rate = learning_rate;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.params.discount = discount;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardTable) -> Self {
        self.rewards = rewards;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check hyper-parameter ranges.
    pub fn validate(&self) -> Result<()> {
        let LearningParameters {
            learning_rate,
            discount,
        } = self.params;

        if !(learning_rate > 0.0 && learning_rate <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("learning rate must be in (0, 1], got {learning_rate}"),
            });
        }
        if !(0.0..=1.0).contains(&discount) {
            return Err(Error::InvalidConfiguration {
                message: format!("discount must be in [0, 1], got {discount}"),
            });
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon must be a non-negative number, got {}", self.epsilon),
            });
        }
        Ok(())
    }

    /// Validate and create the agent, with one table row per [`PieceState`].
    ///
    /// [`PieceState`]: crate::ludo::PieceState
    pub fn build(&self) -> Result<TdAgent> {
        self.validate()?;
        let agent = TdAgent::new(self.rule, StateSpace::NUM_STATES, self.params, self.epsilon)
            .with_rewards(self.rewards.clone());
        Ok(match self.seed {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        })
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(UpdateRule::QLearning)
    }
}
