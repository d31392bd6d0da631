//! Common test utilities for the ludo-td test suite.

#![allow(dead_code)]

use ludo_td::{
    q_learning::{ActionMask, LearningParameters, ValueTable},
    rewards::OutcomeCategory,
};
use rand::{SeedableRng, rngs::StdRng};

pub const EPS: f64 = 1e-12;

pub fn params(learning_rate: f64, discount: f64) -> LearningParameters {
    LearningParameters {
        learning_rate,
        discount,
    }
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Mask of the given shape with `cells` legal at weight 1.
pub fn mask_with(num_states: usize, num_actions: usize, cells: &[(usize, usize)]) -> ActionMask {
    let mut mask = ActionMask::new(num_states, num_actions);
    for &(state, action) in cells {
        mask.allow(state, action);
    }
    mask
}

/// Mask over the full outcome-category action axis.
pub fn category_mask(num_states: usize, cells: &[(usize, usize)]) -> ActionMask {
    mask_with(num_states, OutcomeCategory::COUNT, cells)
}

/// Table of the given shape filled from `(state, action, value)` triples.
pub fn table_with(num_states: usize, num_actions: usize, values: &[(usize, usize, f64)]) -> ValueTable {
    let mut table = ValueTable::new(num_states, num_actions);
    for &(state, action, value) in values {
        table.set(state, action, value);
    }
    table
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
