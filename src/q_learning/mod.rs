//! Tabular temporal-difference learning
//!
//! This module implements the decision-and-update engine of the Ludo agent:
//! dense value tables, ε-greedy selection with random tie-breaking, four
//! interchangeable update rules and an exponential exploration schedule.
//!
//! ## Algorithms
//!
//! | Rule | Policy | Bootstrap | Tables |
//! |------|--------|-----------|--------|
//! | Q-learning | Off-policy | max over next legal pairs | 1 |
//! | Double Q-learning | Off-policy | cross-table greedy value | 2 |
//! | SARSA | On-policy | value of the pair actually taken | 1 |
//! | TD(0) | Off-policy | max over the state's next legal row | 1 |
//!
//! ## Usage Example
//!
//! ```no_run
//! use ludo_td::q_learning::{ActionMask, LearningParameters, TdAgent, UpdateRule};
//! use ludo_td::rewards::OutcomeCategory;
//!
//! let params = LearningParameters { learning_rate: 0.2, discount: 0.5 };
//! let mut agent = TdAgent::new(UpdateRule::QLearning, 4, params, 0.9).with_seed(42);
//!
//! let mut mask = ActionMask::new(4, OutcomeCategory::COUNT);
//! mask.allow(1, 6);
//! if let Some(decision) = agent.choose(&mask)? {
//!     agent.learn(decision.state, decision.action, &mask)?;
//! }
//! # Ok::<(), ludo_td::Error>(())
//! ```

pub mod agent;
pub mod policy;
pub mod q_table;
pub mod schedule;
pub mod serialization;
pub mod update;

pub use agent::{EpisodeStats, TdAgent};
pub use policy::{Decision, SelectionBranch, select_action, select_action_double};
pub use q_table::{ActionMask, TableSide, ValueStore, ValueTable};
pub use schedule::{ExplorationSchedule, decayed_rate};
pub use serialization::{SavedTdAgent, TrainingMetadata};
pub use update::{LearningParameters, Transition, UpdateRule, td_step};
