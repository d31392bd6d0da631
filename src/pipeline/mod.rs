//! Training and comparison pipelines
//!
//! This module provides:
//! - The learning seat ([`TdPlayer`]) and the random baseline
//! - Episode-by-episode training with pluggable observers
//! - Comparison of update rules across player counts

pub mod comparison;
pub mod observers;
pub mod players;
pub mod training;

pub use comparison::{ComparisonEntry, ComparisonFramework, ComparisonResult};
pub use observers::{
    EpisodeObservation, JsonlObserver, MetricsHandle, MetricsObserver, MetricsSummary,
    ProgressObserver, TurnRecord,
};
pub use players::{RandomPlayer, TdPlayer};
pub use training::{AGENT_SEAT, EpisodeReport, TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{LudoPlayer, Observer};
