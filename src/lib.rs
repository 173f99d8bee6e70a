// =============================================================================
// Signal Engine — technical-indicator buy / sell scoring for daily OHLCV series
// =============================================================================
//
// `engine::compute` turns an ordered price series into one `IndicatorRow` per
// point: drawdown, RSI, SMA/EMA, MACD, Bollinger Bands, Stochastic, OBV, and
// the two composite scores.  `stream::IndicatorStream` produces the same rows
// one point at a time.
// =============================================================================

pub mod engine;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod signals;
pub mod stream;
pub mod types;

pub use engine::{compute, compute_with};
pub use error::IndicatorError;
pub use runtime_config::{EngineConfig, ScoreThresholds};
pub use signals::{score_row, ScoreBreakdown};
pub use stream::IndicatorStream;
pub use types::{IndicatorRow, PricePoint};
