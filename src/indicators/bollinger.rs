// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ).  σ is the population standard deviation
// (divide by N) of the same trailing window.

use serde::{Deserialize, Serialize};

use super::sma::window_mean;

/// Result of a Bollinger Band calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerResult {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Bands for a single trailing window of exactly `period` values, oldest
/// first.
///
/// Returns `None` when any band is non-finite.
pub fn bollinger_bands<I>(window: I, period: usize, num_std: f64) -> Option<BollingerResult>
where
    I: IntoIterator<Item = f64> + Clone,
{
    if period == 0 {
        return None;
    }

    let middle = window_mean(window.clone(), period);
    let variance = window
        .into_iter()
        .map(|x| (x - middle).powi(2))
        .sum::<f64>()
        / period as f64;
    let std_dev = variance.sqrt();

    let upper = middle + num_std * std_dev;
    let lower = middle - num_std * std_dev;

    if upper.is_finite() && lower.is_finite() {
        Some(BollingerResult { upper, middle, lower })
    } else {
        None
    }
}

/// Calculate the Bollinger Band series for `closes`, aligned with the input.
///
/// Entries before index `period - 1` are `None`.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Vec<Option<BollingerResult>> {
    let mut result = vec![None; closes.len()];
    if period == 0 {
        return result;
    }

    for i in period.saturating_sub(1)..closes.len() {
        let window = &closes[i + 1 - period..=i];
        result[i] = bollinger_bands(window.iter().copied(), period, num_std);
    }

    result
}
