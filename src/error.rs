//! Error types for the ludo-td crate

use thiserror::Error;

/// Main error type for the ludo-td crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unsupported player count {count} (expected 2, 3 or 4)")]
    InvalidPlayerCount { count: usize },

    #[error("index ({state}, {action}) is out of range for a {states}x{actions} value table")]
    IndexOutOfRange {
        state: usize,
        action: usize,
        states: usize,
        actions: usize,
    },

    #[error("action mask is {got_states}x{got_actions} but the value table is {states}x{actions}")]
    DimensionMismatch {
        states: usize,
        actions: usize,
        got_states: usize,
        got_actions: usize,
    },

    #[error("piece {piece} of seat {seat} cannot move: {reason}")]
    IllegalMove {
        seat: usize,
        piece: usize,
        reason: String,
    },

    #[error("seat {seat} has movable pieces and cannot pass")]
    MustMove { seat: usize },

    #[error("seat {seat} has no movable piece")]
    NoMovablePieces { seat: usize },

    #[error("game already over")]
    GameOver,

    #[error("invalid update rule '{input}'. Expected one of: {expected}")]
    ParseUpdateRule { input: String, expected: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
