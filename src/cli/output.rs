//! Output formatting for CLI

use crate::{
    ludo::PieceState,
    q_learning::ValueTable,
    rewards::{BoardContext, MoveEffect, OutcomeCategory, RewardTable},
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print the 27 rewards as a context × effect grid
pub fn print_reward_table(rewards: &RewardTable) {
    print!("  {:10}", "");
    for context in BoardContext::ALL {
        print!("{:>9}", context.label());
    }
    println!();
    for effect in MoveEffect::ALL {
        print!("  {:10}", effect.label());
        for context in BoardContext::ALL {
            print!("{:>9.2}", rewards.reward_of(OutcomeCategory::new(context, effect)));
        }
        println!();
    }
}

/// Print the non-zero cells of a value table grouped by piece state
pub fn print_value_table(title: &str, table: &ValueTable) {
    print_subsection(title);
    for state in PieceState::ALL {
        if state.index() >= table.num_states() {
            break;
        }
        let mut cells: Vec<(OutcomeCategory, f64)> = OutcomeCategory::all()
            .map(|category| (category, table.get(state.index(), category.index())))
            .filter(|&(_, value)| value != 0.0)
            .collect();
        if cells.is_empty() {
            continue;
        }
        cells.sort_by(|a, b| b.1.total_cmp(&a.1));
        println!("  {}", state.label());
        for (category, value) in cells {
            println!("    {:18} {:>9.4}", category.to_string(), value);
        }
    }
}
