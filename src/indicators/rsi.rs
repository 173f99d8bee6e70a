// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first `period`
//          gains / losses.
// Step 3 — Apply Wilder's exponential smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// The first RSI lands on index `period` (the first `period` deltas seed the
// averages); earlier indices are undefined.
// =============================================================================

/// Incremental Wilder RSI fed with close-to-close deltas.
#[derive(Debug, Clone)]
pub struct WilderRsi {
    period: usize,
    seen: usize,
    avg_gain: f64,
    avg_loss: f64,
}

impl WilderRsi {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            seen: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        }
    }

    /// Feed the next delta; returns the RSI once `period` deltas have been
    /// seen.
    pub fn update(&mut self, delta: f64) -> Option<f64> {
        if self.period == 0 {
            return None;
        }

        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { -delta } else { 0.0 };
        let period_f = self.period as f64;

        self.seen += 1;
        if self.seen <= self.period {
            // Seeding phase: avg_* hold running sums until the window fills.
            self.avg_gain += gain;
            self.avg_loss += loss;
            if self.seen < self.period {
                return None;
            }
            self.avg_gain /= period_f;
            self.avg_loss /= period_f;
        } else {
            self.avg_gain = (self.avg_gain * (period_f - 1.0) + gain) / period_f;
            self.avg_loss = (self.avg_loss * (period_f - 1.0) + loss) / period_f;
        }

        rsi_from_averages(self.avg_gain, self.avg_loss)
    }
}

/// Compute the RSI series for `closes`, aligned with the input.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - indices `< period` => `None`
/// - no down moves => 100.0; no movement at all => 50.0
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    let mut rsi = WilderRsi::new(period);

    for i in 1..closes.len() {
        result[i] = rsi.update(closes[i] - closes[i - 1]);
    }

    result
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If both averages are zero, RSI is 50.0 (no movement).
/// - If average loss is zero (only gains), RSI is 100.0.
/// - Returns `None` when the result is non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    super::defined(rsi)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_warmup_is_undefined() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), 20);
        assert!(series[..14].iter().all(Option::is_none));
        assert!(series[14].is_some());
    }

    #[test]
    fn rsi_all_gains() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market() {
        let series = calculate_rsi(&[100.0; 30], 14);
        for v in series[14..].iter() {
            assert!((v.unwrap() - 50.0).abs() < 1e-10);
        }
    }

    #[test]
    fn rsi_reference_values() {
        // Wilder's worked example (period 14).
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ];
        let series = calculate_rsi(&closes, 14);
        assert!((series[14].unwrap() - 70.46).abs() < 0.05, "got {:?}", series[14]);
        assert!((series[15].unwrap() - 66.25).abs() < 0.05, "got {:?}", series[15]);
        for v in series.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }
}
