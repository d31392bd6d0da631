//! Temporal-difference update rules
//!
//! All rules share one equation,
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α [r + γ b − Q(s,a)]
//! ```
//!
//! and differ only in the bootstrap estimate `b` and in which table they
//! write:
//!
//! | Rule              | Bootstrap `b`                                         | Writes          |
//! |-------------------|-------------------------------------------------------|-----------------|
//! | Q-learning        | max of `Q ⊙ next_mask` over the legal cells of row `s` | primary        |
//! | Double Q-learning | other table's value at this table's greedy action      | one of the two |
//! | SARSA             | `Q ⊙ next_mask` at `(s, a)`                            | primary        |
//! | TD(0)             | max of row `s` of `Q`, legal or not                    | primary        |
//!
//! A masked bootstrap with no legal cell contributes zero.

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    q_learning::q_table::{ActionMask, TableSide, ValueStore, ValueTable},
};

/// Step-size and discount shared by every rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningParameters {
    /// α
    pub learning_rate: f64,
    /// γ
    pub discount: f64,
}

impl Default for LearningParameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            discount: 0.5,
        }
    }
}

/// The closed-form TD step: `old + α (r + γ b − old)`
pub fn td_step(old: f64, reward: f64, bootstrap: f64, params: LearningParameters) -> f64 {
    old + params.learning_rate * (reward + params.discount * bootstrap - old)
}

/// One observed step of the agent
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub state: usize,
    pub action: usize,
    pub reward: f64,
    /// Legal pairs of the decision that follows the move
    pub next_mask: &'a ActionMask,
}

/// The four interchangeable update equations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    QLearning,
    DoubleQLearning,
    Sarsa,
    Td0,
}

impl UpdateRule {
    pub const ALL: [UpdateRule; 4] = [
        UpdateRule::QLearning,
        UpdateRule::DoubleQLearning,
        UpdateRule::Sarsa,
        UpdateRule::Td0,
    ];

    /// Short label used on the command line and in files
    pub fn label(self) -> &'static str {
        match self {
            UpdateRule::QLearning => "q-learning",
            UpdateRule::DoubleQLearning => "double-q-learning",
            UpdateRule::Sarsa => "sarsa",
            UpdateRule::Td0 => "td0",
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            UpdateRule::QLearning => "Q-learning",
            UpdateRule::DoubleQLearning => "Double Q-learning",
            UpdateRule::Sarsa => "SARSA",
            UpdateRule::Td0 => "TD(0)",
        }
    }

    /// Whether the rule needs two value tables
    pub fn uses_two_tables(self) -> bool {
        matches!(self, UpdateRule::DoubleQLearning)
    }

    /// A value store shaped for this rule
    pub fn new_store(self, num_states: usize, num_actions: usize) -> ValueStore {
        if self.uses_two_tables() {
            ValueStore::double(num_states, num_actions)
        } else {
            ValueStore::single(num_states, num_actions)
        }
    }

    /// Apply the rule in place and report which table was written.
    ///
    /// `transition.state`/`transition.action` must be inside the tables;
    /// the agent checks this before calling.
    pub fn apply<R: Rng + ?Sized>(
        self,
        store: &mut ValueStore,
        transition: &Transition<'_>,
        params: LearningParameters,
        rng: &mut R,
    ) -> TableSide {
        let Transition {
            state,
            action,
            reward,
            next_mask,
        } = *transition;

        match self {
            UpdateRule::QLearning => {
                let table = store.primary_mut();
                let bootstrap = table.masked_row_max(next_mask, state).unwrap_or(0.0);
                write(table, state, action, reward, bootstrap, params);
                TableSide::Primary
            }
            UpdateRule::Sarsa => {
                let table = store.primary_mut();
                let bootstrap = table
                    .masked_value(next_mask, state, action)
                    .unwrap_or(0.0);
                write(table, state, action, reward, bootstrap, params);
                TableSide::Primary
            }
            UpdateRule::Td0 => {
                let table = store.primary_mut();
                let bootstrap = table.row_max(state);
                write(table, state, action, reward, bootstrap, params);
                TableSide::Primary
            }
            UpdateRule::DoubleQLearning => {
                let (first, second) = store.pair_mut();
                if rng.random::<f64>() < 0.5 {
                    let best = first.argmax_in_row(state);
                    let bootstrap = second.get(state, best);
                    write(first, state, action, reward, bootstrap, params);
                    TableSide::Primary
                } else {
                    let best = second.argmax_in_row(state);
                    let bootstrap = first.get(state, best);
                    write(second, state, action, reward, bootstrap, params);
                    TableSide::Secondary
                }
            }
        }
    }
}

fn write(
    table: &mut ValueTable,
    state: usize,
    action: usize,
    reward: f64,
    bootstrap: f64,
    params: LearningParameters,
) {
    let old = table.get(state, action);
    table.set(state, action, td_step(old, reward, bootstrap, params));
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UpdateRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "q-learning" | "q" | "qlearning" => Ok(UpdateRule::QLearning),
            "double-q-learning" | "double-q" | "dq" => Ok(UpdateRule::DoubleQLearning),
            "sarsa" => Ok(UpdateRule::Sarsa),
            "td0" | "td-0" | "td(0)" => Ok(UpdateRule::Td0),
            _ => Err(Error::ParseUpdateRule {
                input: s.to_string(),
                expected: UpdateRule::ALL
                    .iter()
                    .map(|rule| rule.label())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    const PARAMS: LearningParameters = LearningParameters {
        learning_rate: 0.5,
        discount: 0.9,
    };

    #[test]
    fn test_td_step_closed_form() {
        let params = LearningParameters {
            learning_rate: 0.2,
            discount: 0.5,
        };
        assert!((td_step(0.0, 1.5, 0.0, params) - 0.3).abs() < 1e-12);
        assert!((td_step(1.0, 0.0, 2.0, params) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_q_learning_ignores_legal_cells_of_other_rows() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut store = ValueStore::single(2, 2);
        store.primary_mut().set(1, 1, 2.0);
        let mut next = ActionMask::new(2, 2);
        next.allow(1, 1);

        let transition = Transition {
            state: 0,
            action: 0,
            reward: 0.0,
            next_mask: &next,
        };
        UpdateRule::QLearning.apply(&mut store, &transition, PARAMS, &mut rng);

        // row 0 has no legal cell, so the bootstrap is zero
        assert_eq!(store.primary().get(0, 0), 0.0);
    }

    #[test]
    fn test_q_learning_uses_legal_max_of_own_row() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut store = ValueStore::single(2, 2);
        store.primary_mut().set(1, 1, 2.0);
        store.primary_mut().set(0, 1, 1.0);
        let mut next = ActionMask::new(2, 2);
        next.allow(1, 1);
        next.allow(0, 1);

        let transition = Transition {
            state: 0,
            action: 0,
            reward: 0.0,
            next_mask: &next,
        };
        UpdateRule::QLearning.apply(&mut store, &transition, PARAMS, &mut rng);

        // 0 + 0.5 * (0 + 0.9 * 1.0 - 0) = 0.45
        assert!((store.primary().get(0, 0) - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_td0_bootstraps_from_unmasked_row() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut store = ValueStore::single(2, 2);
        store.primary_mut().set(0, 1, 2.0);
        store.primary_mut().set(1, 0, 5.0);
        // nothing legal next; TD(0) still reads row 0
        let next = ActionMask::new(2, 2);

        let transition = Transition {
            state: 0,
            action: 0,
            reward: 0.0,
            next_mask: &next,
        };
        UpdateRule::Td0.apply(&mut store, &transition, PARAMS, &mut rng);

        // 0 + 0.5 * (0 + 0.9 * 2.0 - 0) = 0.9
        assert!((store.primary().get(0, 0) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_sarsa_uses_masked_value_of_same_pair() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut store = ValueStore::single(2, 2);
        store.primary_mut().set(0, 0, 1.0);
        store.primary_mut().set(1, 1, 10.0);

        let mut next = ActionMask::new(2, 2);
        next.allow(0, 0);
        next.allow(1, 1);
        let transition = Transition {
            state: 0,
            action: 0,
            reward: 1.0,
            next_mask: &next,
        };
        UpdateRule::Sarsa.apply(&mut store, &transition, PARAMS, &mut rng);
        // 1 + 0.5 * (1 + 0.9 * 1 - 1) = 1.45
        assert!((store.primary().get(0, 0) - 1.45).abs() < 1e-12);

        // pair illegal next step: bootstrap 0
        let empty = ActionMask::new(2, 2);
        let transition = Transition {
            state: 0,
            action: 0,
            reward: 0.0,
            next_mask: &empty,
        };
        UpdateRule::Sarsa.apply(&mut store, &transition, PARAMS, &mut rng);
        assert!((store.primary().get(0, 0) - 0.725).abs() < 1e-12);
    }

    #[test]
    fn test_double_q_writes_exactly_one_table() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut store = ValueStore::double(1, 2);
        let next = ActionMask::new(1, 2);
        let transition = Transition {
            state: 0,
            action: 1,
            reward: 1.0,
            next_mask: &next,
        };

        let side = UpdateRule::DoubleQLearning.apply(&mut store, &transition, PARAMS, &mut rng);
        let primary = store.primary().get(0, 1);
        let secondary = store.secondary().unwrap().get(0, 1);
        match side {
            TableSide::Primary => {
                assert_eq!(primary, 0.5);
                assert_eq!(secondary, 0.0);
            }
            TableSide::Secondary => {
                assert_eq!(primary, 0.0);
                assert_eq!(secondary, 0.5);
            }
        }
    }

    #[test]
    fn test_double_q_cross_bootstrap() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut store = ValueStore::double(1, 2);
        // primary prefers action 0, secondary prefers action 1
        store.primary_mut().set(0, 0, 1.0);
        store.pair_mut().1.set(0, 1, 3.0);
        let next = ActionMask::new(1, 2);
        let transition = Transition {
            state: 0,
            action: 1,
            reward: 0.0,
            next_mask: &next,
        };

        let side = UpdateRule::DoubleQLearning.apply(&mut store, &transition, PARAMS, &mut rng);
        match side {
            // primary's greedy action 0 is scored by secondary: Q2(0,0) = 0
            TableSide::Primary => assert_eq!(store.primary().get(0, 1), 0.0),
            // secondary's greedy action 1 is scored by primary: Q1(0,1) = 0
            TableSide::Secondary => {
                assert!((store.secondary().unwrap().get(0, 1) - 1.5).abs() < 1e-12)
            }
        }
    }

    #[test]
    fn test_rule_parsing() {
        for rule in UpdateRule::ALL {
            assert_eq!(rule.label().parse::<UpdateRule>().unwrap(), rule);
        }
        assert_eq!("TD0".parse::<UpdateRule>().unwrap(), UpdateRule::Td0);
        assert!(matches!(
            "monte-carlo".parse::<UpdateRule>(),
            Err(Error::ParseUpdateRule { .. })
        ));
    }
}
