//! Ludo environment
//!
//! The environment the agents are trained in: board rules, turn order and
//! the translation from board positions to value-table coordinates.

pub mod board;
pub mod game;
pub mod translator;

pub use board::{Board, MovePreview, seats_for};
pub use game::{LudoGame, MAX_TURNS, Observation, TurnOutcome};
pub use translator::{MoveOptions, PieceOption, PieceState, StateSpace};
