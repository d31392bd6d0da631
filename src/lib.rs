//! Tabular temporal-difference agents for Ludo
//!
//! This crate provides:
//! - A reward model over 27 move-outcome categories
//! - Dense value tables with legality masks and ε-greedy selection
//! - Q-learning, double Q-learning, SARSA and TD(0) update rules
//! - A Ludo environment and a training pipeline against random opponents
//! - Comparison of update rules across player counts

pub mod analysis;
pub mod app;
pub mod cli;
pub mod error;
pub mod export;
pub mod ludo;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod rewards;

pub use error::{Error, Result};
pub use q_learning::{TdAgent, UpdateRule};
pub use rewards::{OutcomeCategory, RewardTable};
