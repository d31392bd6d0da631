//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::training::EpisodeReport;
use crate::{Error, Result, ludo::TurnOutcome, ports::Observer};

/// One played turn as written to the observation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: usize,
    pub seat: usize,
    pub dice: u8,
    /// `None` for a forced pass
    pub piece: Option<usize>,
    pub from: Option<u8>,
    pub to: Option<u8>,
    pub captured: usize,
    pub died: bool,
}

impl From<&TurnOutcome> for TurnRecord {
    fn from(outcome: &TurnOutcome) -> Self {
        let mv = outcome.mv.as_ref();
        Self {
            turn: outcome.turn,
            seat: outcome.seat,
            dice: outcome.dice,
            piece: mv.map(|m| m.piece),
            from: mv.map(|m| m.from),
            to: mv.map(|m| m.to),
            captured: mv.map_or(0, |m| m.captured.len()),
            died: mv.is_some_and(|m| m.died),
        }
    }
}

/// Complete observation of a training episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeObservation {
    pub report: EpisodeReport,
    pub turns: Vec<TurnRecord>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self { progress_bar: None }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(report.episode as u64 + 1);
            pb.set_message(format!(
                "win {:.1}% eps {:.3}",
                report.win_rate, report.epsilon
            ));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish();
        }
        Ok(())
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_turns: f64,
    pub avg_reward: f64,
    /// Share of decisions taken on the exploration branch
    pub exploration_share: f64,
    pub captures: usize,
    pub deaths: usize,
}

#[derive(Debug, Default)]
struct MetricsState {
    episodes: usize,
    wins: usize,
    turns: usize,
    reward: f64,
    decisions: usize,
    explorations: usize,
    captures: usize,
    deaths: usize,
}

/// Shared read access to a [`MetricsObserver`] that was handed to a pipeline
#[derive(Debug, Clone)]
pub struct MetricsHandle {
    state: Arc<Mutex<MetricsState>>,
}

impl MetricsHandle {
    pub fn summary(&self) -> Result<MetricsSummary> {
        let state = self.state.lock().map_err(|_| Error::InvalidConfiguration {
            message: "metrics observer lock poisoned".to_string(),
        })?;
        Ok(summarize(&state))
    }
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

fn summarize(state: &MetricsState) -> MetricsSummary {
    MetricsSummary {
        episodes: state.episodes,
        wins: state.wins,
        win_rate: ratio(state.wins as f64, state.episodes),
        avg_turns: ratio(state.turns as f64, state.episodes),
        avg_reward: ratio(state.reward, state.episodes),
        exploration_share: ratio(state.explorations as f64, state.decisions),
        captures: state.captures,
        deaths: state.deaths,
    }
}

/// Metrics observer - Tracks training metrics
///
/// Captures and deaths are counted for the agent's seat only.
pub struct MetricsObserver {
    state: Arc<Mutex<MetricsState>>,
    agent_seat: usize,
}

impl MetricsObserver {
    pub fn new(agent_seat: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(MetricsState::default())),
            agent_seat,
        }
    }

    /// Handle that stays readable after the observer is boxed into a pipeline
    pub fn handle(&self) -> MetricsHandle {
        MetricsHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn update<F: FnOnce(&mut MetricsState)>(&self, f: F) -> Result<()> {
        let mut state = self.state.lock().map_err(|_| Error::InvalidConfiguration {
            message: "metrics observer lock poisoned".to_string(),
        })?;
        f(&mut state);
        Ok(())
    }

    pub fn summary(&self) -> Result<MetricsSummary> {
        self.handle().summary()
    }
}

impl Observer for MetricsObserver {
    fn on_turn(&mut self, _episode: usize, outcome: &TurnOutcome) -> Result<()> {
        if outcome.seat != self.agent_seat {
            return Ok(());
        }
        if let Some(mv) = &outcome.mv {
            let captured = mv.captured.len();
            let died = mv.died;
            self.update(|state| {
                state.captures += captured;
                if died {
                    state.deaths += 1;
                }
            })?;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        self.update(|state| {
            state.episodes += 1;
            if report.won {
                state.wins += 1;
            }
            state.turns += report.turns;
            state.reward += report.cumulative_reward;
            state.decisions += report.decisions;
            state.explorations += report.explorations;
        })
    }
}

/// JSONL observer - Exports one observation per episode in JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_turns: Vec<TurnRecord>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_turns: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_turns.clear();
        Ok(())
    }

    fn on_turn(&mut self, _episode: usize, outcome: &TurnOutcome) -> Result<()> {
        self.current_turns.push(TurnRecord::from(outcome));
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        let observation = EpisodeObservation {
            report: report.clone(),
            turns: std::mem::take(&mut self.current_turns),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
