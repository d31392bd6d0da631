//! Application layer: validated construction of agents.

pub mod config;

pub use config::AgentConfig;
