//! ε-greedy action selection over one or two value tables
//!
//! Selection works on the masked product of a value table and the current
//! [`ActionMask`]: illegal pairs never take part. Greedy choices break ties
//! uniformly at random so that repeated identical states do not always
//! favour the first pair in table order.

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::q_learning::q_table::{ActionMask, ValueTable};

/// How a decision was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionBranch {
    /// Uniform legal sample because the exploration draw fired
    Explore,
    /// Arg-max of a masked value table
    Exploit,
    /// Uniform legal sample because no legal cell had a defined value
    Fallback,
}

/// A chosen `(state, action)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub state: usize,
    pub action: usize,
    pub branch: SelectionBranch,
}

impl Decision {
    fn new((state, action): (usize, usize), branch: SelectionBranch) -> Self {
        Self {
            state,
            action,
            branch,
        }
    }

    pub fn pair(&self) -> (usize, usize) {
        (self.state, self.action)
    }
}

/// Uniformly sample one legal pair of `mask`.
pub fn uniform_legal<R: Rng + ?Sized>(mask: &ActionMask, rng: &mut R) -> Option<(usize, usize)> {
    mask.legal_pairs().choose(rng).copied()
}

/// Uniformly sample among the legal pairs whose masked value equals `max`.
fn tied_argmax<R: Rng + ?Sized>(
    table: &ValueTable,
    mask: &ActionMask,
    max: f64,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let ties: Vec<(usize, usize)> = table
        .masked(mask)
        .filter(|(_, value)| *value == max)
        .map(|(pair, _)| pair)
        .collect();
    ties.choose(rng).copied()
}

fn fallback<R: Rng + ?Sized>(mask: &ActionMask, rng: &mut R) -> Option<Decision> {
    uniform_legal(mask, rng).map(|pair| Decision::new(pair, SelectionBranch::Fallback))
}

/// ε-greedy selection over a single table.
///
/// Returns `None` when `mask` has no legal pair; callers must skip the
/// learning update for that step.
pub fn select_action<R: Rng + ?Sized>(
    table: &ValueTable,
    mask: &ActionMask,
    epsilon: f64,
    rng: &mut R,
) -> Option<Decision> {
    if mask.is_empty() {
        return None;
    }

    if rng.random::<f64>() < epsilon {
        return uniform_legal(mask, rng).map(|pair| Decision::new(pair, SelectionBranch::Explore));
    }

    match table.masked_max(mask) {
        Some(max) => tied_argmax(table, mask, max, rng)
            .map(|pair| Decision::new(pair, SelectionBranch::Exploit)),
        None => fallback(mask, rng),
    }
}

/// ε-greedy selection over two tables (double learning).
///
/// On the greedy branch a fair coin picks which table's arg-max is used when
/// both have a defined masked maximum; otherwise whichever table has one.
pub fn select_action_double<R: Rng + ?Sized>(
    first: &ValueTable,
    second: &ValueTable,
    mask: &ActionMask,
    epsilon: f64,
    rng: &mut R,
) -> Option<Decision> {
    if mask.is_empty() {
        return None;
    }

    if rng.random::<f64>() < epsilon {
        return uniform_legal(mask, rng).map(|pair| Decision::new(pair, SelectionBranch::Explore));
    }

    let chosen = match (first.masked_max(mask), second.masked_max(mask)) {
        (Some(first_max), Some(second_max)) => {
            if rng.random::<f64>() < 0.5 {
                Some((first, first_max))
            } else {
                Some((second, second_max))
            }
        }
        (Some(first_max), None) => Some((first, first_max)),
        (None, Some(second_max)) => Some((second, second_max)),
        (None, None) => None,
    };

    match chosen {
        Some((table, max)) => tied_argmax(table, mask, max, rng)
            .map(|pair| Decision::new(pair, SelectionBranch::Exploit)),
        None => fallback(mask, rng),
    }
}
