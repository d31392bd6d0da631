//! Observer port - abstraction for training observation and data collection
//!
//! Observers collect progress, metrics and traces during training without
//! coupling the training loop to any output format.

use crate::{Result, ludo::TurnOutcome, pipeline::EpisodeReport};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_turn(episode, outcome)` - For each played turn
///    - `on_episode_end(report)`
/// 3. `on_training_end()` - Once at the end
///
/// Every method defaults to doing nothing.
///
/// # Examples
///
/// ```no_run
/// use ludo_td::{pipeline::EpisodeReport, ports::Observer};
///
/// struct WinCounter {
///     wins: usize,
/// }
///
/// impl Observer for WinCounter {
///     fn on_episode_end(&mut self, report: &EpisodeReport) -> ludo_td::Result<()> {
///         if report.won {
///             self.wins += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every turn, including forced passes.
    fn on_turn(&mut self, _episode: usize, _outcome: &TurnOutcome) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
