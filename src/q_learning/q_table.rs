//! Dense value tables and legal-action masks
//!
//! A [`ValueTable`] holds one value estimate per `(state, action)` pair.
//! An [`ActionMask`] of the same shape marks which pairs are legal at the
//! current decision; each legal cell carries a weight that multiplies the
//! table value when the two are combined. Illegal cells carry no value at all,
//! so masked products never contain a floating-point sentinel.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Dense `num_states × num_actions` table of value estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    num_states: usize,
    num_actions: usize,
    values: Vec<f64>,
}

impl ValueTable {
    /// Create a zero-initialized table
    pub fn new(num_states: usize, num_actions: usize) -> Self {
        Self {
            num_states,
            num_actions,
            values: vec![0.0; num_states * num_actions],
        }
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn contains(&self, state: usize, action: usize) -> bool {
        state < self.num_states && action < self.num_actions
    }

    fn offset(&self, state: usize, action: usize) -> usize {
        debug_assert!(
            self.contains(state, action),
            "({state}, {action}) outside {}x{} table",
            self.num_states,
            self.num_actions
        );
        state * self.num_actions + action
    }

    /// Get value for a state-action pair
    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.values[self.offset(state, action)]
    }

    /// Set value for a state-action pair
    pub fn set(&mut self, state: usize, action: usize, value: f64) {
        let offset = self.offset(state, action);
        self.values[offset] = value;
    }

    /// All values of one state
    pub fn row(&self, state: usize) -> &[f64] {
        let start = self.offset(state, 0);
        &self.values[start..start + self.num_actions]
    }

    /// Largest value of a row, legal or not
    pub fn row_max(&self, state: usize) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Index of the largest value in a row; the first one wins on ties.
    pub fn argmax_in_row(&self, state: usize) -> usize {
        let row = self.row(state);
        row.iter()
            .enumerate()
            .fold(0, |best, (action, &value)| if value > row[best] { action } else { best })
    }

    /// Iterate over `((state, action), value)` for the legal cells of `mask`,
    /// with each value multiplied by the cell's mask weight.
    pub fn masked<'a>(
        &'a self,
        mask: &'a ActionMask,
    ) -> impl Iterator<Item = ((usize, usize), f64)> + 'a {
        mask.legal_cells()
            .map(move |((state, action), weight)| ((state, action), self.get(state, action) * weight))
    }

    /// Largest masked value, ignoring NaN; `None` when no legal cell has a
    /// defined value.
    pub fn masked_max(&self, mask: &ActionMask) -> Option<f64> {
        self.masked(mask)
            .map(|(_, value)| value)
            .filter(|value| !value.is_nan())
            .reduce(f64::max)
    }

    /// Largest masked value within one state row
    pub fn masked_row_max(&self, mask: &ActionMask, state: usize) -> Option<f64> {
        self.masked(mask)
            .filter(|((row, _), value)| *row == state && !value.is_nan())
            .map(|(_, value)| value)
            .reduce(f64::max)
    }

    /// Masked value of a single cell, `None` when the cell is illegal
    pub fn masked_value(&self, mask: &ActionMask, state: usize, action: usize) -> Option<f64> {
        mask.weight(state, action)
            .map(|weight| self.get(state, action) * weight)
    }

    /// Error unless `mask` has the same shape as this table
    pub fn check_shape(&self, mask: &ActionMask) -> Result<()> {
        if mask.num_states() != self.num_states || mask.num_actions() != self.num_actions {
            return Err(Error::DimensionMismatch {
                states: self.num_states,
                actions: self.num_actions,
                got_states: mask.num_states(),
                got_actions: mask.num_actions(),
            });
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|value| *value = 0.0);
    }
}

/// Per-decision legality of every `(state, action)` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMask {
    num_states: usize,
    num_actions: usize,
    cells: Vec<Option<f64>>,
}

impl ActionMask {
    /// Create a mask with every pair illegal
    pub fn new(num_states: usize, num_actions: usize) -> Self {
        Self {
            num_states,
            num_actions,
            cells: vec![None; num_states * num_actions],
        }
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn offset(&self, state: usize, action: usize) -> usize {
        debug_assert!(
            state < self.num_states && action < self.num_actions,
            "({state}, {action}) outside {}x{} mask",
            self.num_states,
            self.num_actions
        );
        state * self.num_actions + action
    }

    /// Mark a pair legal with weight 1.0
    pub fn allow(&mut self, state: usize, action: usize) {
        self.allow_weighted(state, action, 1.0);
    }

    /// Mark a pair legal with an explicit weight
    pub fn allow_weighted(&mut self, state: usize, action: usize, weight: f64) {
        let offset = self.offset(state, action);
        self.cells[offset] = Some(weight);
    }

    pub fn is_legal(&self, state: usize, action: usize) -> bool {
        self.weight(state, action).is_some()
    }

    /// Weight of a legal cell, `None` when illegal or out of range
    pub fn weight(&self, state: usize, action: usize) -> Option<f64> {
        if state >= self.num_states || action >= self.num_actions {
            return None;
        }
        self.cells[state * self.num_actions + action]
    }

    /// Legal cells as `((state, action), weight)` in row-major order
    pub fn legal_cells(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        self.cells.iter().enumerate().filter_map(|(offset, cell)| {
            cell.map(|weight| ((offset / self.num_actions, offset % self.num_actions), weight))
        })
    }

    /// Legal `(state, action)` pairs in row-major order
    pub fn legal_pairs(&self) -> Vec<(usize, usize)> {
        self.legal_cells().map(|(pair, _)| pair).collect()
    }

    pub fn legal_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// Which of the two tables of a [`ValueStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableSide {
    Primary,
    Secondary,
}

/// One table, or two independent tables for double learning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueStore {
    primary: ValueTable,
    secondary: Option<ValueTable>,
}

impl ValueStore {
    pub fn single(num_states: usize, num_actions: usize) -> Self {
        Self {
            primary: ValueTable::new(num_states, num_actions),
            secondary: None,
        }
    }

    pub fn double(num_states: usize, num_actions: usize) -> Self {
        Self {
            primary: ValueTable::new(num_states, num_actions),
            secondary: Some(ValueTable::new(num_states, num_actions)),
        }
    }

    pub fn primary(&self) -> &ValueTable {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut ValueTable {
        &mut self.primary
    }

    pub fn secondary(&self) -> Option<&ValueTable> {
        self.secondary.as_ref()
    }

    pub fn is_double(&self) -> bool {
        self.secondary.is_some()
    }

    /// Mutable access to both tables; the secondary is created on demand
    /// when a single store is driven by a double-learning rule.
    pub fn pair_mut(&mut self) -> (&mut ValueTable, &mut ValueTable) {
        let (states, actions) = (self.primary.num_states(), self.primary.num_actions());
        let secondary = self
            .secondary
            .get_or_insert_with(|| ValueTable::new(states, actions));
        (&mut self.primary, secondary)
    }

    pub fn table(&self, side: TableSide) -> Option<&ValueTable> {
        match side {
            TableSide::Primary => Some(&self.primary),
            TableSide::Secondary => self.secondary.as_ref(),
        }
    }

    pub fn reset(&mut self) {
        self.primary.reset();
        if let Some(secondary) = &mut self.secondary {
            secondary.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_initialization() {
        let table = ValueTable::new(4, 27);
        assert_eq!(table.num_states(), 4);
        assert_eq!(table.num_actions(), 27);
        assert!((0..4).all(|state| table.row(state).iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn test_table_set_get() {
        let mut table = ValueTable::new(3, 3);
        table.set(1, 2, 1.5);
        assert_eq!(table.get(1, 2), 1.5);
        assert_eq!(table.row(1), &[0.0, 0.0, 1.5]);
    }

    #[test]
    fn test_masked_max_only_sees_legal_cells() {
        let mut table = ValueTable::new(2, 3);
        table.set(0, 0, 5.0);
        table.set(1, 1, 0.5);
        table.set(1, 2, 0.8);

        let mut mask = ActionMask::new(2, 3);
        mask.allow(1, 1);
        mask.allow(1, 2);

        assert_eq!(table.masked_max(&mask), Some(0.8));
        assert_eq!(table.masked_row_max(&mask, 0), None);
        assert_eq!(table.masked_value(&mask, 0, 0), None);
    }

    #[test]
    fn test_masked_max_of_empty_mask() {
        let table = ValueTable::new(2, 2);
        let mask = ActionMask::new(2, 2);
        assert!(mask.is_empty());
        assert_eq!(table.masked_max(&mask), None);
    }

    #[test]
    fn test_mask_weights_scale_values() {
        let mut table = ValueTable::new(1, 2);
        table.set(0, 1, 2.0);
        let mut mask = ActionMask::new(1, 2);
        mask.allow_weighted(0, 1, 0.5);
        assert_eq!(table.masked_value(&mask, 0, 1), Some(1.0));
    }

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        let mut table = ValueTable::new(1, 4);
        table.set(0, 1, 1.0);
        table.set(0, 3, 1.0);
        assert_eq!(table.argmax_in_row(0), 1);
    }

    #[test]
    fn test_shape_check() {
        let table = ValueTable::new(2, 2);
        assert!(table.check_shape(&ActionMask::new(2, 2)).is_ok());
        assert!(matches!(
            table.check_shape(&ActionMask::new(3, 2)),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_store_modes() {
        assert!(!ValueStore::single(2, 2).is_double());
        let mut store = ValueStore::double(2, 2);
        assert!(store.is_double());
        store.pair_mut().1.set(0, 0, 3.0);
        assert_eq!(store.table(TableSide::Secondary).unwrap().get(0, 0), 3.0);
        store.reset();
        assert_eq!(store.table(TableSide::Secondary).unwrap().get(0, 0), 0.0);
    }
}
