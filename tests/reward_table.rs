mod common;

use common::assert_close;
use ludo_td::rewards::{
    BoardContext, MoveEffect, OutcomeCategory, RewardTable, SafeBaseRewards, SeverityTiers,
};

fn reward(table: &RewardTable, name: &str) -> f64 {
    let category: OutcomeCategory = name.parse().unwrap();
    table.reward_of(category)
}

#[test]
fn every_category_has_its_documented_reward() {
    let table = RewardTable::default();
    let expected = [
        ("SAFE_MoveOut", 0.4),
        ("SAFE_MoveDice", 0.01),
        ("SAFE_Goal", 0.8),
        ("SAFE_Star", 0.8),
        ("SAFE_Globe", 0.4),
        ("SAFE_Protect", 0.2),
        ("SAFE_Kill", 1.5),
        ("SAFE_Die", -0.5),
        ("SAFE_GoalZone", 0.2),
        ("UNSAFE_MoveOut", 0.0),
        ("UNSAFE_MoveDice", -0.39),
        ("UNSAFE_Goal", 1.2),
        ("UNSAFE_Star", 0.4),
        ("UNSAFE_Globe", 0.8),
        ("UNSAFE_Protect", 0.6),
        ("UNSAFE_Kill", 1.9),
        ("UNSAFE_Die", -1.3),
        ("UNSAFE_GoalZone", 0.6),
        ("HOME_MoveOut", 1.6),
        ("HOME_MoveDice", -0.79),
        ("HOME_Goal", 0.0),
        ("HOME_Star", 0.0),
        ("HOME_Globe", -0.4),
        ("HOME_Protect", -0.6),
        ("HOME_Kill", 0.7),
        ("HOME_Die", -1.3),
        ("HOME_GoalZone", -0.6),
    ];
    assert_eq!(expected.len(), OutcomeCategory::COUNT);
    for (name, value) in expected {
        assert_close(reward(&table, name), value);
    }
}

#[test]
fn category_names_parse_case_insensitively() {
    let table = RewardTable::default();
    assert_close(reward(&table, "safe_kill"), 1.5);
    assert!("SAFE_Teleport".parse::<OutcomeCategory>().is_err());
}

#[test]
fn reward_lookup_by_index_matches_category() {
    let table = RewardTable::default();
    for (category, value) in table.iter() {
        assert_eq!(table.reward_at(category.index()), Some(value));
    }
    assert_eq!(table.reward_at(OutcomeCategory::COUNT), None);
}

#[test]
fn tiers_are_applied_additively() {
    let tiers = SeverityTiers {
        very_bad: -10.0,
        bad: -1.0,
        good: 1.0,
        very_good: 10.0,
    };
    let base = SafeBaseRewards {
        move_out: 0.0,
        move_dice: 0.0,
        goal: 0.0,
        star: 0.0,
        globe: 0.0,
        protect: 0.0,
        kill: 0.0,
        die: 0.0,
        goal_zone: 0.0,
    };
    let table = RewardTable::new(tiers, base);

    let of = |context, effect| table.reward_of(OutcomeCategory::new(context, effect));
    assert_close(of(BoardContext::Safe, MoveEffect::Kill), 0.0);
    assert_close(of(BoardContext::Unsafe, MoveEffect::Star), -1.0);
    assert_close(of(BoardContext::Unsafe, MoveEffect::Globe), 1.0);
    assert_close(of(BoardContext::Unsafe, MoveEffect::Die), -10.0);
    assert_close(of(BoardContext::Home, MoveEffect::MoveOut), 10.0);
    assert_close(of(BoardContext::Home, MoveEffect::Goal), -10.0);
}
