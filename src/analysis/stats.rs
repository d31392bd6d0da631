//! Summary statistics for training curves

use serde::{Deserialize, Serialize};

/// Window used for smoothing per-episode curves
pub const MOVING_AVERAGE_WINDOW: usize = 100;

/// Trailing moving average with the same length as `values`.
///
/// The first `window - 1` entries have no full window and are zero, so the
/// first full average sits at index `window - 1`. This is offset by one from
/// a cumulative-sum window over the series with `window` zeros prepended,
/// which yields `n + 1` values and puts the first full average at index
/// `window`. A window of zero or one returns the input unchanged.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 {
        return values.to_vec();
    }

    let mut averaged = vec![0.0; values.len()];
    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            averaged[i] = sum / window as f64;
        }
    }
    averaged
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Mean, spread and end point of a curve
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub final_value: f64,
    pub max: f64,
}

impl CurveSummary {
    pub fn of(values: &[f64]) -> Self {
        Self {
            mean: mean(values),
            std_dev: std_dev(values),
            final_value: values.last().copied().unwrap_or(0.0),
            max: values.iter().copied().reduce(f64::max).unwrap_or(0.0),
        }
    }
}
