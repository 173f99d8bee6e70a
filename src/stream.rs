// =============================================================================
// Indicator Stream — incremental engine for polling dashboards
// =============================================================================
//
// Accepts one new daily point at a time and emits the row the batch engine
// would produce for that index.  State is bounded: running recurrences (EMA,
// Wilder averages, peak, OBV) plus trailing windows sized by the config.
//
// The trailing windows are reduced with the same helpers, in the same
// oldest-first order, as the batch series functions, so the two paths agree
// bit for bit.
// =============================================================================

use std::collections::VecDeque;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{IndicatorError, Result};
use crate::indicators::drawdown::drawdown_from_peak;
use crate::indicators::stochastic::stochastic_d;
use crate::indicators::{bollinger_bands, defined, obv_step, stochastic_k, window_mean};
use crate::indicators::{Ema, SignalLine, WilderRsi};
use crate::runtime_config::EngineConfig;
use crate::signals::score_row;
use crate::types::{IndicatorRow, PricePoint};

/// Push a value onto a bounded window, dropping the oldest beyond `cap`.
fn push_bounded<T>(window: &mut VecDeque<T>, value: T, cap: usize) {
    window.push_back(value);
    while window.len() > cap {
        window.pop_front();
    }
}

/// Mean of the newest `period` values of `window`, or `None` if fewer exist.
fn trailing_mean(window: &VecDeque<f64>, period: usize) -> Option<f64> {
    if window.len() < period {
        return None;
    }
    let skip = window.len() - period;
    defined(window_mean(window.iter().skip(skip).copied(), period))
}

/// Reject a point with a non-numeric close or a date not after `last_date`.
fn check_point(point: &PricePoint, index: usize, last_date: Option<NaiveDate>) -> Result<()> {
    if !point.close.is_finite() {
        return Err(IndicatorError::MissingField { index, field: "close" });
    }
    if matches!(last_date, Some(last) if point.date <= last) {
        return Err(IndicatorError::OutOfOrder { index });
    }
    Ok(())
}

/// Incremental counterpart of [`crate::engine::compute_with`].
#[derive(Debug, Clone)]
pub struct IndicatorStream {
    config: EngineConfig,
    count: usize,
    last_date: Option<NaiveDate>,
    prev_close: Option<f64>,
    peak: f64,

    closes: VecDeque<f64>,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    stoch_k: VecDeque<Option<f64>>,
    obv: f64,
    obv_window: VecDeque<f64>,

    rsi: WilderRsi,
    ema_mid: Ema,
    ema_trend: Ema,
    macd_fast: Ema,
    macd_slow: Ema,
    macd_signal: SignalLine,
}

impl IndicatorStream {
    /// Create an empty stream.  Fails if the config is invalid.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            count: 0,
            last_date: None,
            prev_close: None,
            peak: f64::NEG_INFINITY,
            closes: VecDeque::with_capacity(config.max_close_window() + 1),
            highs: VecDeque::with_capacity(config.stoch_period + 1),
            lows: VecDeque::with_capacity(config.stoch_period + 1),
            stoch_k: VecDeque::with_capacity(config.stoch_signal_period + 1),
            obv: 0.0,
            obv_window: VecDeque::with_capacity(config.obv_mean_period + 1),
            rsi: WilderRsi::new(config.rsi_period),
            ema_mid: Ema::new(config.ema_mid),
            ema_trend: Ema::new(config.ema_trend),
            macd_fast: Ema::new(config.macd_fast),
            macd_slow: Ema::new(config.macd_slow),
            macd_signal: SignalLine::new(config.macd_signal),
            config,
        })
    }

    /// Number of points accepted so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fold in the next point and return its fully scored row.
    ///
    /// A rejected point (non-numeric close, date not after the previous one)
    /// leaves the stream unchanged.
    pub fn push(&mut self, point: PricePoint) -> Result<IndicatorRow> {
        let index = self.count;
        check_point(&point, index, self.last_date)?;

        let cfg = &self.config;
        let close = point.close;
        let mut row = IndicatorRow::blank(point);

        // Drawdown.
        self.peak = self.peak.max(close);
        row.drawdown = drawdown_from_peak(close, self.peak);

        // RSI and OBV both key off the previous close.
        if let Some(prev) = self.prev_close {
            row.rsi = self.rsi.update(close - prev);
            self.obv = obv_step(self.obv, prev, close, row.point.volume);
        }
        row.obv = self.obv;
        push_bounded(&mut self.obv_window, self.obv, cfg.obv_mean_period);
        row.obv_mean = trailing_mean(&self.obv_window, cfg.obv_mean_period);

        // Moving averages.
        push_bounded(&mut self.closes, close, cfg.max_close_window());
        row.sma21 = trailing_mean(&self.closes, cfg.sma_short);
        row.sma50 = trailing_mean(&self.closes, cfg.sma_fast);
        row.sma200 = trailing_mean(&self.closes, cfg.sma_slow);
        row.ema34 = defined(self.ema_mid.update(close));
        row.ema200 = defined(self.ema_trend.update(close));

        // MACD.
        let fast = self.macd_fast.update(close);
        let slow = self.macd_slow.update(close);
        if index + 1 >= cfg.macd_slow {
            row.macd = defined(fast - slow);
        }
        row.macd_signal = row.macd.and_then(|m| self.macd_signal.update(m));
        if let (Some(m), Some(s)) = (row.macd, row.macd_signal) {
            row.macd_histogram = Some(m - s);
        }

        // Bollinger.
        if self.closes.len() >= cfg.bb_period {
            let skip = self.closes.len() - cfg.bb_period;
            if let Some(bands) =
                bollinger_bands(self.closes.iter().skip(skip).copied(), cfg.bb_period, cfg.bb_num_std)
            {
                row.bb_upper = Some(bands.upper);
                row.bb_middle = Some(bands.middle);
                row.bb_lower = Some(bands.lower);
            }
        }

        // Stochastic.
        push_bounded(&mut self.highs, row.point.high, cfg.stoch_period);
        push_bounded(&mut self.lows, row.point.low, cfg.stoch_period);
        if self.highs.len() == cfg.stoch_period {
            row.stoch = stochastic_k(self.highs.iter().copied(), self.lows.iter().copied(), close);
        }
        push_bounded(&mut self.stoch_k, row.stoch, cfg.stoch_signal_period);
        if self.stoch_k.len() == cfg.stoch_signal_period {
            row.stoch_signal = stochastic_d(self.stoch_k.iter().copied(), cfg.stoch_signal_period);
        }

        let scores = score_row(&row, &cfg.thresholds);
        row.buy_score = scores.buy_score();
        row.sell_score = scores.sell_score();

        self.prev_close = Some(close);
        self.last_date = Some(row.date());
        self.count += 1;

        debug!(
            date = %row.date(),
            buy_score = row.buy_score,
            sell_score = row.sell_score,
            "stream row computed"
        );

        Ok(row)
    }

    /// Push a batch of points in order.
    ///
    /// The whole batch is checked first: if any point would be rejected,
    /// nothing is applied and the stream is left unchanged.
    pub fn extend<I>(&mut self, points: I) -> Result<Vec<IndicatorRow>>
    where
        I: IntoIterator<Item = PricePoint>,
    {
        let points: Vec<PricePoint> = points.into_iter().collect();

        let mut last_date = self.last_date;
        for (offset, point) in points.iter().enumerate() {
            check_point(point, self.count + offset, last_date)?;
            last_date = Some(point.date);
        }

        points.into_iter().map(|p| self.push(p)).collect()
    }
}
