//! Player port - abstraction over anything that can take a Ludo turn
//!
//! The training pipeline drives every seat through this trait, so the
//! learning agent and its baseline opponents are interchangeable.

use crate::{
    Result,
    ludo::{Board, Observation},
};

/// A participant in a Ludo game
///
/// The pipeline only asks for a piece when at least one piece can move;
/// forced passes never reach the player.
///
/// # Event Sequence
///
/// For every turn of the player's seat with a legal move:
/// 1. `choose_piece(observation)`
/// 2. `after_move(board, seat, dice)` with the board after the move
///
/// `on_game_end()` is called once per game for every seat.
pub trait LudoPlayer: Send {
    /// Pick one of `observation.movable`.
    fn choose_piece(&mut self, observation: &Observation) -> Result<usize>;

    /// Called after the chosen move was applied.
    ///
    /// Learning players run their update step here. The default does nothing.
    fn after_move(&mut self, _board: &Board, _seat: usize, _dice: u8) -> Result<()> {
        Ok(())
    }

    /// Called once a game has ended, won or abandoned.
    fn on_game_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Name used in logs and reports
    fn name(&self) -> &str;

    /// Seed the player's random generator for reproducible runs.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
