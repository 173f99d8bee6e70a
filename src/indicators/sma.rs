// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_N[i] = (close[i-N+1] + ... + close[i]) / N
//
// Undefined until N values exist.

/// Mean of one trailing window, summed oldest-first.
///
/// `period` is the window length the caller sliced; it is passed explicitly so
/// the slice and the deque paths divide by the same value.
pub fn window_mean<I>(window: I, period: usize) -> f64
where
    I: IntoIterator<Item = f64>,
{
    window.into_iter().sum::<f64>() / period as f64
}

/// Compute the SMA series of `values` for `period`.
///
/// Entries before index `period - 1` are `None`; `period == 0` yields an
/// all-`None` series.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 {
        return result;
    }

    for i in period.saturating_sub(1)..values.len() {
        let window = &values[i + 1 - period..=i];
        result[i] = super::defined(window_mean(window.iter().copied(), period));
    }

    result
}
