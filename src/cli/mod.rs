//! CLI infrastructure for training and comparing tabular Ludo agents

pub mod commands;
pub mod config;
pub mod output;

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level
/// (0 = warn, 1 = info, 2 = debug, 3+ = trace).
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ludo_td={default_level}")));
    // a subscriber may already be installed by an embedding process or test
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
