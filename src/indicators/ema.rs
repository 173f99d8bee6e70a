// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = close_0
//   EMA_t  = alpha * close_t + (1 - alpha) * EMA_{t-1}
//
// Seeding with the first close (rather than an SMA of the first `span` values)
// makes the EMA defined from the very first period; it converges on the true
// average as history accumulates.
// =============================================================================

/// Incremental EMA state.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    /// Create an EMA with the given span.  A span of zero is treated as one
    /// (alpha = 1, the EMA tracks the input).
    pub fn new(span: usize) -> Self {
        Self {
            alpha: 2.0 / (span.max(1) as f64 + 1.0),
            value: None,
        }
    }

    /// Fold one value into the average and return the updated EMA.
    pub fn update(&mut self, value: f64) -> f64 {
        let next = match self.value {
            None => value,
            Some(prev) => self.alpha * value + (1.0 - self.alpha) * prev,
        };
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// Compute the EMA series for `values` and `span`, one output per input.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut ema = Ema::new(span);
    values.iter().map(|&v| ema.update(v)).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_seeded_with_first_value() {
        let ema = calculate_ema(&[10.0, 20.0], 3);
        assert!((ema[0] - 10.0).abs() < 1e-10);
        // alpha = 0.5 => 0.5 * 20 + 0.5 * 10
        assert!((ema[1] - 15.0).abs() < 1e-10);
    }

    #[test]
    fn ema_known_values() {
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let ema = calculate_ema(&closes, 5);
        assert_eq!(ema.len(), closes.len());

        let alpha = 2.0 / 6.0;
        let mut expected = closes[0];
        for (i, &c) in closes.iter().enumerate().skip(1) {
            expected = alpha * c + (1.0 - alpha) * expected;
            assert!((ema[i] - expected).abs() < 1e-10, "index {i}: got {}, expected {expected}", ema[i]);
        }
    }

    #[test]
    fn ema_constant_input_stays_constant() {
        let ema = calculate_ema(&[100.0; 50], 34);
        assert!(ema.iter().all(|v| (v - 100.0).abs() < 1e-10));
    }

    #[test]
    fn ema_converges_after_level_shift() {
        let mut closes = vec![50.0; 10];
        closes.extend(std::iter::repeat(100.0).take(400));
        let ema = calculate_ema(&closes, 34);
        let gaps: Vec<f64> = ema[10..].iter().map(|v| (100.0 - v).abs()).collect();
        assert!(gaps.windows(2).all(|w| w[1] <= w[0]));
        assert!(gaps.last().unwrap() < &1e-6);
    }

    #[test]
    fn ema_span_zero_tracks_input() {
        let ema = calculate_ema(&[1.0, 5.0, 3.0], 0);
        assert_eq!(ema, vec![1.0, 5.0, 3.0]);
    }
}
