// =============================================================================
// MACD (Moving Average Convergence Divergence)
// =============================================================================
//
//   MACD      = EMA(fast) - EMA(slow)
//   Signal    = EMA(signal) of the MACD line
//   Histogram = MACD - Signal
//
// Both EMAs run from the first close, but the MACD line is only reported once
// `slow` closes exist (index slow - 1).  The signal line is seeded with the
// first reported MACD value and reported once `signal` MACD values have been
// folded in.  With 12/26/9 the MACD starts at index 25 and the signal at 33.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::ema::Ema;

/// Incremental signal line over a MACD series with a minimum-count warm-up.
#[derive(Debug, Clone)]
pub struct SignalLine {
    ema: Ema,
    period: usize,
    count: usize,
}

impl SignalLine {
    pub fn new(period: usize) -> Self {
        Self {
            ema: Ema::new(period),
            period,
            count: 0,
        }
    }

    /// Fold the next MACD value; returns the signal once warmed up.
    pub fn update(&mut self, macd: f64) -> Option<f64> {
        let value = self.ema.update(macd);
        self.count += 1;
        if self.count >= self.period {
            super::defined(value)
        } else {
            None
        }
    }
}

/// MACD line, signal line and histogram, aligned with the input closes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// Calculate the MACD series for `closes`.
pub fn calculate_macd(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    let mut fast = Ema::new(fast_period);
    let mut slow = Ema::new(slow_period);
    let mut signal_line = SignalLine::new(signal_period);

    let mut series = MacdSeries {
        macd: Vec::with_capacity(closes.len()),
        signal: Vec::with_capacity(closes.len()),
        histogram: Vec::with_capacity(closes.len()),
    };

    for (i, &close) in closes.iter().enumerate() {
        let fast_ema = fast.update(close);
        let slow_ema = slow.update(close);

        let macd = if i + 1 >= slow_period {
            super::defined(fast_ema - slow_ema)
        } else {
            None
        };
        let signal = macd.and_then(|m| signal_line.update(m));
        let histogram = match (macd, signal) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        };

        series.macd.push(macd);
        series.signal.push(signal);
        series.histogram.push(histogram);
    }

    series
}
