//! CSV export of training curves, comparisons and value tables

use std::path::Path;

use serde::Serialize;

use crate::{
    Result,
    ludo::PieceState,
    pipeline::{ComparisonResult, TrainingResult},
    q_learning::TdAgent,
    rewards::OutcomeCategory,
};

/// One row per training episode
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    pub episode: usize,
    pub epsilon: f64,
    pub win_rate: f64,
    pub win_rate_ma: f64,
    pub reward: f64,
    pub reward_ma: f64,
}

/// One row per (rule, player count) run
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRecord {
    pub rule: String,
    pub players: usize,
    pub episodes: usize,
    pub wins: usize,
    pub final_win_rate: f64,
    pub mean_win_rate: f64,
    pub std_win_rate: f64,
    pub mean_reward: f64,
    pub std_reward: f64,
}

/// One row per table cell
#[derive(Debug, Clone, Serialize)]
pub struct ValueRecord {
    pub state: String,
    pub category: String,
    pub q1: f64,
    pub q2: Option<f64>,
}

pub fn history_records(result: &TrainingResult) -> Vec<HistoryRecord> {
    (0..result.episodes)
        .map(|episode| HistoryRecord {
            episode,
            epsilon: result.epsilon_history[episode],
            win_rate: result.win_rate_history[episode],
            win_rate_ma: result.win_rate_moving_average[episode],
            reward: result.reward_history[episode],
            reward_ma: result.reward_moving_average[episode],
        })
        .collect()
}

pub fn comparison_records(result: &ComparisonResult) -> Vec<ComparisonRecord> {
    result
        .entries
        .iter()
        .map(|entry| ComparisonRecord {
            rule: entry.rule.label().to_string(),
            players: entry.players,
            episodes: entry.episodes,
            wins: entry.wins,
            final_win_rate: entry.win_rate.final_value,
            mean_win_rate: entry.win_rate.mean,
            std_win_rate: entry.win_rate.std_dev,
            mean_reward: entry.reward.mean,
            std_reward: entry.reward.std_dev,
        })
        .collect()
}

/// Rows for every state and outcome category, named rather than indexed
pub fn value_records(agent: &TdAgent) -> Vec<ValueRecord> {
    let primary = agent.q_table();
    let secondary = agent.q2_table();
    let mut records = Vec::new();
    for state in PieceState::ALL {
        if state.index() >= primary.num_states() {
            break;
        }
        for category in OutcomeCategory::all() {
            let (s, a) = (state.index(), category.index());
            records.push(ValueRecord {
                state: state.label().to_string(),
                category: category.to_string(),
                q1: primary.get(s, a),
                q2: secondary.map(|table| table.get(s, a)),
            });
        }
    }
    records
}

fn write_records<P: AsRef<Path>, T: Serialize>(path: P, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_history<P: AsRef<Path>>(path: P, result: &TrainingResult) -> Result<()> {
    write_records(path, &history_records(result))
}

pub fn write_comparison<P: AsRef<Path>>(path: P, result: &ComparisonResult) -> Result<()> {
    write_records(path, &comparison_records(result))
}

pub fn write_value_table<P: AsRef<Path>>(path: P, agent: &TdAgent) -> Result<()> {
    write_records(path, &value_records(agent))
}
