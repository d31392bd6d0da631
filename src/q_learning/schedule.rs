//! Exponential exploration decay

use serde::{Deserialize, Serialize};

/// `initial × e^(−decay × episode)`
///
/// The result is not clamped: an initial rate above 1 keeps the exploration
/// branch certain until it decays below 1.
pub fn decayed_rate(initial: f64, decay: f64, episode: usize) -> f64 {
    initial * (-decay * episode as f64).exp()
}

/// Per-episode exploration schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSchedule {
    /// Rate at episode 0
    pub initial: f64,
    /// Decay constant per episode
    pub decay: f64,
}

impl ExplorationSchedule {
    pub fn new(initial: f64, decay: f64) -> Self {
        Self { initial, decay }
    }

    /// Rate after `episode` episodes
    pub fn rate_at(&self, episode: usize) -> f64 {
        decayed_rate(self.initial, self.decay, episode)
    }
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self::new(0.9, 0.05)
    }
}
