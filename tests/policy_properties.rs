mod common;

use std::collections::HashMap;

use common::{mask_with, rng, table_with};
use ludo_td::q_learning::{
    ActionMask, SelectionBranch, ValueTable, select_action, select_action_double,
};

#[test]
fn full_exploration_only_picks_legal_pairs() {
    let table = table_with(3, 5, &[(0, 0, 9.0), (2, 4, 7.0)]);
    let mask = mask_with(3, 5, &[(1, 1), (1, 3), (2, 2)]);
    let mut rng = rng(1);

    for _ in 0..500 {
        let decision = select_action(&table, &mask, 1.0, &mut rng).unwrap();
        assert!(mask.is_legal(decision.state, decision.action));
        assert_eq!(decision.branch, SelectionBranch::Explore);
    }
}

#[test]
fn greedy_selection_returns_masked_maximum() {
    let table = table_with(2, 4, &[(0, 0, 5.0), (0, 1, 0.3), (1, 2, 0.8), (1, 3, -1.0)]);
    let mask = mask_with(2, 4, &[(0, 1), (1, 2), (1, 3)]);
    let mut rng = rng(2);

    for _ in 0..50 {
        let decision = select_action(&table, &mask, 0.0, &mut rng).unwrap();
        assert_eq!(decision.pair(), (1, 2));
        assert_eq!(decision.branch, SelectionBranch::Exploit);
    }
}

#[test]
fn greedy_ties_are_broken_uniformly() {
    let tied = [(0, 0), (0, 2), (1, 1), (1, 3)];
    let mut values: Vec<(usize, usize, f64)> = tied.iter().map(|&(s, a)| (s, a, 0.5)).collect();
    values.push((1, 0, 0.1));
    let table = table_with(2, 4, &values);
    let mut cells = tied.to_vec();
    cells.push((1, 0));
    let mask = mask_with(2, 4, &cells);

    let trials = 8000;
    let mut rng = rng(3);
    let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
    for _ in 0..trials {
        let decision = select_action(&table, &mask, 0.0, &mut rng).unwrap();
        *counts.entry(decision.pair()).or_default() += 1;
    }

    assert_eq!(counts.len(), tied.len());
    for pair in tied {
        let share = counts[&pair] as f64 / trials as f64;
        assert!((share - 0.25).abs() < 0.03, "{pair:?} chosen {share}");
    }
}

#[test]
fn empty_mask_yields_no_decision() {
    let table = ValueTable::new(2, 3);
    let mask = ActionMask::new(2, 3);
    let mut rng = rng(4);
    assert!(select_action(&table, &mask, 0.0, &mut rng).is_none());
    assert!(select_action(&table, &mask, 1.0, &mut rng).is_none());
    assert!(select_action_double(&table, &table, &mask, 0.5, &mut rng).is_none());
}

#[test]
fn undefined_masked_values_fall_back_to_uniform() {
    let mut table = ValueTable::new(1, 3);
    table.set(0, 0, f64::NAN);
    table.set(0, 1, f64::NAN);
    let mask = mask_with(1, 3, &[(0, 0), (0, 1)]);
    let mut rng = rng(5);

    let decision = select_action(&table, &mask, 0.0, &mut rng).unwrap();
    assert_eq!(decision.branch, SelectionBranch::Fallback);
    assert!(mask.is_legal(decision.state, decision.action));
}

#[test]
fn double_selection_consults_each_table_half_the_time() {
    let first = table_with(1, 2, &[(0, 0, 1.0)]);
    let second = table_with(1, 2, &[(0, 1, 1.0)]);
    let mask = mask_with(1, 2, &[(0, 0), (0, 1)]);

    let trials = 4000;
    let mut rng = rng(6);
    let from_first = (0..trials)
        .filter(|_| {
            select_action_double(&first, &second, &mask, 0.0, &mut rng)
                .unwrap()
                .action
                == 0
        })
        .count();

    let share = from_first as f64 / trials as f64;
    assert!((share - 0.5).abs() < 0.04, "first table share {share}");
}

#[test]
fn mask_weights_scale_values_before_comparison() {
    let table = table_with(1, 2, &[(0, 0, 1.0), (0, 1, 0.8)]);
    let mut mask = ActionMask::new(1, 2);
    mask.allow_weighted(0, 0, 0.5);
    mask.allow(0, 1);
    let mut rng = rng(7);

    let decision = select_action(&table, &mask, 0.0, &mut rng).unwrap();
    assert_eq!(decision.pair(), (0, 1));
}
