// =============================================================================
// Shared types used across the signal engine
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV record as supplied by the price data source.
///
/// The engine trusts the ordering and the `low <= {open, close} <= high`
/// relationship; it only checks that `close` is a finite number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl PricePoint {
    /// Build a point from a single price, as providers without true OHLC do
    /// (`open = high = low = close`).
    pub fn from_close(date: NaiveDate, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }
}

/// A [`PricePoint`] augmented with every derived indicator and the two
/// composite scores.
///
/// `None` marks an undefined value (insufficient history or a numeric
/// degeneracy such as a zero stochastic range).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    #[serde(flatten)]
    pub point: PricePoint,

    pub drawdown: Option<f64>,
    pub rsi: Option<f64>,

    pub sma21: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub ema34: Option<f64>,
    pub ema200: Option<f64>,

    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,

    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,

    pub stoch: Option<f64>,
    pub stoch_signal: Option<f64>,

    pub obv: f64,
    pub obv_mean: Option<f64>,

    pub buy_score: u8,
    pub sell_score: u8,
}

impl IndicatorRow {
    /// A row with no derived values yet; indicators are filled in afterwards.
    pub fn blank(point: PricePoint) -> Self {
        Self {
            point,
            drawdown: None,
            rsi: None,
            sma21: None,
            sma50: None,
            sma200: None,
            ema34: None,
            ema200: None,
            macd: None,
            macd_signal: None,
            macd_histogram: None,
            bb_upper: None,
            bb_middle: None,
            bb_lower: None,
            stoch: None,
            stoch_signal: None,
            obv: 0.0,
            obv_mean: None,
            buy_score: 0,
            sell_score: 0,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.point.date
    }

    pub fn close(&self) -> f64 {
        self.point.close
    }
}
