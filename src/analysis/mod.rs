//! Analysis of training curves

pub mod stats;

pub use stats::{CurveSummary, MOVING_AVERAGE_WINDOW, mean, moving_average, std_dev};
