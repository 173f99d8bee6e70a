// =============================================================================
// Drawdown from running peak
// =============================================================================
//
//   drawdown_t = close_t / max(close_0..=close_t) - 1
//
// Always <= 0, exactly 0 on a new (or matched) peak.

/// Calculate the drawdown series; `None` only for a degenerate (zero) peak.
pub fn calculate_drawdown(closes: &[f64]) -> Vec<Option<f64>> {
    let mut peak = f64::NEG_INFINITY;
    closes
        .iter()
        .map(|&close| {
            peak = peak.max(close);
            drawdown_from_peak(close, peak)
        })
        .collect()
}

pub(crate) fn drawdown_from_peak(close: f64, peak: f64) -> Option<f64> {
    super::defined(close / peak - 1.0)
}
