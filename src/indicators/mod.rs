// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the buy /
// sell scores.  Every series function returns a vector aligned index-for-index
// with its input, where `None` marks a value that is undefined (insufficient
// history or a numeric degeneracy).
//
// The incremental building blocks (`Ema`, `WilderRsi`, `SignalLine`, and the
// window reducers) are shared with the streaming engine so both paths perform
// the exact same floating-point operations in the same order.

pub mod bollinger;
pub mod drawdown;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use bollinger::{bollinger_bands, calculate_bollinger, BollingerResult};
pub use drawdown::calculate_drawdown;
pub use ema::{calculate_ema, Ema};
pub use macd::{calculate_macd, MacdSeries, SignalLine};
pub use obv::{calculate_obv, obv_step};
pub use rsi::{calculate_rsi, WilderRsi};
pub use sma::{calculate_sma, window_mean};
pub use stochastic::{calculate_stochastic, stochastic_k, StochasticSeries};

/// Treat non-finite results (NaN, ±inf) as undefined.
pub fn defined(value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}
