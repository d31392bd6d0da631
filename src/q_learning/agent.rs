//! Tabular TD agent
//!
//! The agent owns everything a training run mutates: its value table(s),
//! reward table, exploration rate, random generator and the per-episode
//! accumulators. Two agents never share state.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    q_learning::{
        policy::{Decision, SelectionBranch, select_action, select_action_double},
        q_table::{ActionMask, TableSide, ValueStore, ValueTable},
        update::{LearningParameters, Transition, UpdateRule},
    },
    rewards::{OutcomeCategory, RewardTable},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TdAgentState {
    pub rule: UpdateRule,
    pub store: ValueStore,
    pub rewards: RewardTable,
    pub params: LearningParameters,
    pub epsilon: f64,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Counters reset at the start of every episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// Sum of rewards looked up by learning steps ("max expected reward")
    pub cumulative_reward: f64,
    /// Decisions taken
    pub decisions: usize,
    /// Decisions taken on the exploration branch
    pub explorations: usize,
    /// Learning updates applied
    pub updates: usize,
}

/// Tabular agent driven by one [`UpdateRule`]
///
/// The action axis of the tables is the [`OutcomeCategory`] index, so the
/// reward of a learning step is looked up from the action taken.
#[derive(Debug, Clone)]
pub struct TdAgent {
    rule: UpdateRule,
    store: ValueStore,
    rewards: RewardTable,
    params: LearningParameters,
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
    stats: EpisodeStats,
}

impl TdAgent {
    /// Create a new agent with zeroed tables
    ///
    /// # Arguments
    ///
    /// * `rule` - Update equation used by [`TdAgent::learn`]
    /// * `num_states` - Rows of the value table(s)
    /// * `params` - α and γ
    /// * `epsilon` - Initial exploration rate
    pub fn new(rule: UpdateRule, num_states: usize, params: LearningParameters, epsilon: f64) -> Self {
        Self {
            rule,
            store: rule.new_store(num_states, OutcomeCategory::COUNT),
            rewards: RewardTable::default(),
            params,
            epsilon,
            rng: build_rng(None),
            rng_seed: None,
            stats: EpisodeStats::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(Some(seed));
        self
    }

    pub fn with_rewards(mut self, rewards: RewardTable) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = build_rng(seed);
        self.rng_seed = seed;
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    pub fn params(&self) -> LearningParameters {
        self.params
    }

    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    /// Primary value table
    pub fn q_table(&self) -> &ValueTable {
        self.store.primary()
    }

    /// Secondary value table, present for double learning
    pub fn q2_table(&self) -> Option<&ValueTable> {
        self.store.secondary()
    }

    pub fn num_states(&self) -> usize {
        self.store.primary().num_states()
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Replace the exploration rate used for subsequent decisions
    pub fn update_epsilon(&mut self, epsilon: f64) {
        debug!(rule = %self.rule, epsilon, "exploration rate updated");
        self.epsilon = epsilon;
    }

    pub fn episode_stats(&self) -> &EpisodeStats {
        &self.stats
    }

    /// Return the accumulators of the finished episode and reset them
    pub fn take_episode_stats(&mut self) -> EpisodeStats {
        std::mem::take(&mut self.stats)
    }

    /// Pick a `(state, action)` pair among the legal cells of `mask`.
    ///
    /// `Ok(None)` means no legal action exists; no update should follow.
    pub fn choose(&mut self, mask: &ActionMask) -> Result<Option<Decision>> {
        self.store.primary().check_shape(mask)?;

        let decision = match (self.rule.uses_two_tables(), self.store.secondary()) {
            (true, Some(secondary)) => select_action_double(
                self.store.primary(),
                secondary,
                mask,
                self.epsilon,
                &mut self.rng,
            ),
            _ => select_action(self.store.primary(), mask, self.epsilon, &mut self.rng),
        };

        match decision {
            Some(decision) => {
                self.stats.decisions += 1;
                match decision.branch {
                    SelectionBranch::Explore => self.stats.explorations += 1,
                    SelectionBranch::Fallback => {
                        debug!(
                            state = decision.state,
                            action = decision.action,
                            "no defined masked value, sampled uniformly"
                        );
                    }
                    SelectionBranch::Exploit => {}
                }
            }
            None => debug!("no legal action available"),
        }

        Ok(decision)
    }

    /// Apply the agent's update rule for a step that took `(state, action)`.
    ///
    /// The reward is the reward-table entry of the outcome category `action`
    /// and is added to the episode's cumulative reward.
    pub fn learn(&mut self, state: usize, action: usize, next_mask: &ActionMask) -> Result<TableSide> {
        let table = self.store.primary();
        if !table.contains(state, action) {
            return Err(Error::IndexOutOfRange {
                state,
                action,
                states: table.num_states(),
                actions: table.num_actions(),
            });
        }
        table.check_shape(next_mask)?;

        let reward = self
            .rewards
            .reward_at(action)
            .ok_or(Error::IndexOutOfRange {
                state,
                action,
                states: table.num_states(),
                actions: OutcomeCategory::COUNT,
            })?;

        let transition = Transition {
            state,
            action,
            reward,
            next_mask,
        };
        let side = self
            .rule
            .apply(&mut self.store, &transition, self.params, &mut self.rng);

        self.stats.cumulative_reward += reward;
        self.stats.updates += 1;
        Ok(side)
    }

    /// Zero the tables and restore the seeded generator
    pub fn reset(&mut self) {
        self.store.reset();
        self.stats = EpisodeStats::default();
        self.rng = build_rng(self.rng_seed);
    }

    pub(crate) fn export_state(&self) -> TdAgentState {
        TdAgentState {
            rule: self.rule,
            store: self.store.clone(),
            rewards: self.rewards.clone(),
            params: self.params,
            epsilon: self.epsilon,
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(state: TdAgentState) -> Self {
        Self {
            rule: state.rule,
            store: state.store,
            rewards: state.rewards,
            params: state.params,
            epsilon: state.epsilon,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
            stats: EpisodeStats::default(),
        }
    }
}
