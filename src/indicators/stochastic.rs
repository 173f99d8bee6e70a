// =============================================================================
// Stochastic Oscillator (%K / %D)
// =============================================================================
//
//   %K = 100 * (close - lowest_low) / (highest_high - lowest_low)
//   %D = SMA(%K, signal_period)
//
// Both extremes span the trailing `period` bars including the current one.  A
// zero high-low range (flat market, or a provider reporting high = low =
// close) makes %K undefined rather than a division by zero.

use serde::{Deserialize, Serialize};

use super::sma::window_mean;

/// %K for one trailing window of highs and lows ending at `close`.
pub fn stochastic_k<H, L>(highs: H, lows: L, close: f64) -> Option<f64>
where
    H: IntoIterator<Item = f64>,
    L: IntoIterator<Item = f64>,
{
    let highest = highs.into_iter().fold(f64::NEG_INFINITY, f64::max);
    let lowest = lows.into_iter().fold(f64::INFINITY, f64::min);
    let range = highest - lowest;

    if range == 0.0 || !range.is_finite() {
        return None;
    }
    super::defined(100.0 * (close - lowest) / range)
}

/// %D over the trailing `%K` window; undefined if any %K in it is undefined.
pub fn stochastic_d<I>(k_window: I, period: usize) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let values: Option<Vec<f64>> = k_window.into_iter().collect();
    let values = values?;
    if values.len() != period {
        return None;
    }
    super::defined(window_mean(values, period))
}

/// %K and %D series aligned with the input bars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

/// Calculate the stochastic oscillator over `highs`, `lows` and `closes`.
///
/// The three slices must have equal length.
pub fn calculate_stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
    signal_period: usize,
) -> StochasticSeries {
    let len = closes.len().min(highs.len()).min(lows.len());
    let mut k = vec![None; len];
    let mut d = vec![None; len];
    if period == 0 {
        return StochasticSeries { k, d };
    }

    for i in period.saturating_sub(1)..len {
        let start = i + 1 - period;
        k[i] = stochastic_k(
            highs[start..=i].iter().copied(),
            lows[start..=i].iter().copied(),
            closes[i],
        );
    }

    if signal_period > 0 {
        for i in signal_period.saturating_sub(1)..len {
            d[i] = stochastic_d(k[i + 1 - signal_period..=i].iter().copied(), signal_period);
        }
    }

    StochasticSeries { k, d }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stochastic_basic() {
        let high = [130.0, 132.0, 131.0, 133.0, 135.0, 134.0, 136.0, 138.0, 137.0, 139.0];
        let low = [126.0, 128.0, 127.0, 129.0, 131.0, 130.0, 132.0, 134.0, 133.0, 135.0];
        let close = [128.0, 131.0, 129.0, 132.0, 134.0, 132.0, 135.0, 137.0, 135.0, 138.0];
        let series = calculate_stochastic(&high, &low, &close, 5, 3);
        assert!(series.k[3].is_none());
        // window 0..=4: highest 135, lowest 126 => 100 * 8 / 9
        assert!((series.k[4].unwrap() - 800.0 / 9.0).abs() < 1e-10);
        assert!(series.d[5].is_none());
        assert!(series.d[6].is_some());
        for v in series.k.iter().flatten() {
            assert!((0.0..=100.0).contains(v), "%K {v} out of range");
        }
    }

    #[test]
    fn zero_range_is_undefined() {
        let flat = [100.0; 20];
        let series = calculate_stochastic(&flat, &flat, &flat, 14, 3);
        assert!(series.k.iter().all(Option::is_none));
        assert!(series.d.iter().all(Option::is_none));
    }

    #[test]
    fn close_at_high_is_one_hundred() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let highs: Vec<f64> = closes.clone();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
        let series = calculate_stochastic(&highs, &lows, &closes, 14, 3);
        assert!((series.k[19].unwrap() - 100.0).abs() < 1e-10);
        assert!((series.d[19].unwrap() - 100.0).abs() < 1e-10);
    }
}
