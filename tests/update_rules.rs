mod common;

use common::{EPS, assert_close, category_mask, mask_with, params, rng};
use ludo_td::{
    q_learning::{
        ActionMask, TableSide, TdAgent, Transition, UpdateRule, ValueStore, decayed_rate,
        select_action, td_step,
    },
    rewards::{BoardContext, MoveEffect, OutcomeCategory},
};

#[test]
fn closed_form_step_matches_literal_example() {
    let new = td_step(0.0, 1.5, 0.0, params(0.2, 0.5));
    assert!((new - 0.3).abs() < EPS);

    let new = td_step(1.0, 0.5, 2.0, params(0.1, 0.9));
    assert_close(new, 1.0 + 0.1 * (0.5 + 0.9 * 2.0 - 1.0));
}

#[test]
fn agent_q_learning_uses_safe_kill_reward() {
    let mut agent = TdAgent::new(UpdateRule::QLearning, 4, params(0.2, 0.5), 0.0);
    let kill = OutcomeCategory::new(BoardContext::Safe, MoveEffect::Kill).index();
    agent.learn(1, kill, &category_mask(4, &[])).unwrap();
    assert_close(agent.q_table().get(1, kill), 0.3);
}

#[test]
fn q_learning_bootstraps_from_legal_cells_of_the_state_row() {
    let mut store = ValueStore::single(2, 4);
    store.primary_mut().set(0, 0, 0.5);
    store.primary_mut().set(0, 2, 7.0);
    store.primary_mut().set(1, 2, 2.0);
    store.primary_mut().set(1, 3, 9.0);
    // (0, 2) holds the row maximum but is not legal next; row 1 is ignored
    let next = mask_with(2, 4, &[(0, 0), (1, 2), (1, 3)]);
    let transition = Transition {
        state: 0,
        action: 1,
        reward: 1.0,
        next_mask: &next,
    };

    let side = UpdateRule::QLearning.apply(&mut store, &transition, params(0.2, 0.5), &mut rng(1));
    assert_eq!(side, TableSide::Primary);
    assert_close(store.primary().get(0, 1), 0.2 * (1.0 + 0.5 * 0.5));
}

#[test]
fn q_learning_without_legal_cells_in_the_row_bootstraps_zero() {
    let mut store = ValueStore::single(2, 2);
    store.primary_mut().set(1, 1, 2.0);
    let next = mask_with(2, 2, &[(1, 1)]);
    let transition = Transition {
        state: 0,
        action: 0,
        reward: 0.0,
        next_mask: &next,
    };

    UpdateRule::QLearning.apply(&mut store, &transition, params(0.5, 0.9), &mut rng(1));
    assert_eq!(store.primary().get(0, 0), 0.0);
}

#[test]
fn td0_bootstraps_from_the_whole_state_row() {
    let mut store = ValueStore::single(2, 4);
    store.primary_mut().set(0, 0, 0.5);
    store.primary_mut().set(0, 2, 7.0);
    store.primary_mut().set(1, 3, 9.0);
    // same layout as the Q-learning case: the masked-out (0, 2) still counts
    let next = mask_with(2, 4, &[(0, 0), (1, 3)]);
    let transition = Transition {
        state: 0,
        action: 1,
        reward: 1.0,
        next_mask: &next,
    };

    UpdateRule::Td0.apply(&mut store, &transition, params(0.2, 0.5), &mut rng(1));
    assert_close(store.primary().get(0, 1), 0.2 * (1.0 + 0.5 * 7.0));

    let mut q_store = ValueStore::single(2, 4);
    q_store.primary_mut().set(0, 0, 0.5);
    q_store.primary_mut().set(0, 2, 7.0);
    q_store.primary_mut().set(1, 3, 9.0);
    UpdateRule::QLearning.apply(&mut q_store, &transition, params(0.2, 0.5), &mut rng(1));
    assert_close(q_store.primary().get(0, 1), 0.2 * (1.0 + 0.5 * 0.5));
}

#[test]
fn sarsa_bootstraps_from_the_taken_pair() {
    let mut store = ValueStore::single(1, 2);
    store.primary_mut().set(0, 1, 0.5);

    let legal = mask_with(1, 2, &[(0, 1)]);
    let transition = Transition {
        state: 0,
        action: 1,
        reward: 1.0,
        next_mask: &legal,
    };
    UpdateRule::Sarsa.apply(&mut store, &transition, params(0.2, 0.5), &mut rng(1));
    assert_close(store.primary().get(0, 1), 0.5 + 0.2 * (1.0 + 0.25 - 0.5));

    // an illegal pair bootstraps from zero
    let mut store = ValueStore::single(1, 2);
    store.primary_mut().set(0, 1, 0.5);
    let illegal = mask_with(1, 2, &[(0, 0)]);
    let transition = Transition {
        next_mask: &illegal,
        ..transition
    };
    UpdateRule::Sarsa.apply(&mut store, &transition, params(0.2, 0.5), &mut rng(1));
    assert_close(store.primary().get(0, 1), 0.5 + 0.2 * (1.0 - 0.5));
}

#[test]
fn double_q_learning_mutates_exactly_one_table_each_call() {
    let next = ActionMask::new(2, 3);
    let mut rng = rng(9);
    let trials = 4000;
    let mut primary_writes = 0;

    for _ in 0..trials {
        let mut store = UpdateRule::DoubleQLearning.new_store(2, 3);
        let before = store.clone();
        let transition = Transition {
            state: 1,
            action: 2,
            reward: 1.0,
            next_mask: &next,
        };
        let side = UpdateRule::DoubleQLearning.apply(&mut store, &transition, params(0.2, 0.5), &mut rng);

        let primary_changed = store.primary() != before.primary();
        let secondary_changed = store.secondary() != before.secondary();
        assert!(primary_changed != secondary_changed);
        match side {
            TableSide::Primary => {
                assert!(primary_changed);
                primary_writes += 1;
            }
            TableSide::Secondary => assert!(secondary_changed),
        }
    }

    let share = primary_writes as f64 / trials as f64;
    assert!((share - 0.5).abs() < 0.04, "primary share {share}");
}

#[test]
fn double_q_learning_bootstraps_across_tables() {
    let next = ActionMask::new(1, 2);
    let mut rng = rng(10);

    // find a call that writes the primary table
    loop {
        let mut store = UpdateRule::DoubleQLearning.new_store(1, 2);
        store.primary_mut().set(0, 1, 3.0);
        let (_, secondary) = store.pair_mut();
        secondary.set(0, 1, 4.0);
        let transition = Transition {
            state: 0,
            action: 0,
            reward: 0.0,
            next_mask: &next,
        };
        if UpdateRule::DoubleQLearning.apply(&mut store, &transition, params(0.5, 1.0), &mut rng)
            == TableSide::Primary
        {
            // arg-max of the primary row is action 1, valued by the secondary table
            assert_close(store.primary().get(0, 0), 0.5 * 4.0);
            break;
        }
    }
}

#[test]
fn exploration_schedule_decays_exponentially() {
    assert_close(decayed_rate(0.9, 0.05, 0), 0.9);
    assert!((decayed_rate(0.9, 0.05, 100) - 0.9 * (-5.0f64).exp()).abs() < 1e-4);
    assert!((decayed_rate(0.9, 0.05, 100) - 0.00606).abs() < 1e-4);
    for episode in 0..200 {
        assert!(decayed_rate(0.9, 0.05, episode + 1) < decayed_rate(0.9, 0.05, episode));
    }
}

#[test]
fn two_by_two_end_to_end() {
    let mut store = ValueStore::single(2, 2);
    let mask = mask_with(2, 2, &[(0, 0), (0, 1)]);
    let mut rng = rng(11);

    let decision = select_action(store.primary(), &mask, 0.0, &mut rng).unwrap();
    assert!(decision.pair() == (0, 0) || decision.pair() == (0, 1));

    let before = store.primary().get(decision.state, decision.action);
    let transition = Transition {
        state: decision.state,
        action: decision.action,
        reward: 1.0,
        next_mask: &mask,
    };
    UpdateRule::QLearning.apply(&mut store, &transition, params(0.2, 0.5), &mut rng);
    assert!(store.primary().get(decision.state, decision.action) > before);
}

#[test]
fn every_rule_learns_through_the_agent() {
    for rule in UpdateRule::ALL {
        let mut agent = TdAgent::new(rule, 2, params(0.2, 0.5), 0.0).with_seed(3);
        let mask = category_mask(2, &[(0, 4), (1, 6)]);
        let decision = agent.choose(&mask).unwrap().unwrap();
        agent
            .learn(decision.state, decision.action, &mask)
            .unwrap();
        assert_eq!(agent.episode_stats().updates, 1, "{rule}");
    }
}
