// =============================================================================
// Composite Scorer — eight mirrored buy / sell votes
// =============================================================================
//
// Buy votes                      Sell votes
//   RSI < oversold                 RSI > overbought
//   drawdown < drawdown_buy        drawdown > drawdown_sell
//   MACD > signal                  MACD < signal
//   SMA50 > SMA200                 SMA50 < SMA200
//   close < lower band             close > upper band
//   %K < stoch_oversold            %K > stoch_overbought
//   OBV > OBV mean                 OBV < OBV mean
//   EMA200 > SMA200                EMA200 < SMA200
//
// A comparison with an undefined operand never votes.  Scores are plain sums;
// there is no smoothing or hysteresis between rows.
// =============================================================================

use serde::Serialize;

use crate::runtime_config::ScoreThresholds;
use crate::types::IndicatorRow;

/// One boolean vote of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Vote {
    pub name: &'static str,
    pub active: bool,
}

/// Every vote behind a row's buy and sell scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub buy: [Vote; 8],
    pub sell: [Vote; 8],
}

impl ScoreBreakdown {
    pub fn buy_score(&self) -> u8 {
        count_active(&self.buy)
    }

    pub fn sell_score(&self) -> u8 {
        count_active(&self.sell)
    }

    /// Names of the buy votes currently firing.
    pub fn active_buy(&self) -> Vec<&'static str> {
        self.buy.iter().filter(|v| v.active).map(|v| v.name).collect()
    }

    /// Names of the sell votes currently firing.
    pub fn active_sell(&self) -> Vec<&'static str> {
        self.sell.iter().filter(|v| v.active).map(|v| v.name).collect()
    }
}

fn count_active(votes: &[Vote]) -> u8 {
    votes.iter().filter(|v| v.active).count() as u8
}

/// `a < b`, false when either side is undefined.
pub fn below(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

/// `a > b`, false when either side is undefined.
pub fn above(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

fn vote(name: &'static str, active: bool) -> Vote {
    Vote { name, active }
}

/// Evaluate the 16 votes for a row whose indicator fields are already filled.
pub fn score_row(row: &IndicatorRow, thresholds: &ScoreThresholds) -> ScoreBreakdown {
    let close = Some(row.close());
    let obv = Some(row.obv);

    let buy = [
        vote("rsi_oversold", below(row.rsi, Some(thresholds.rsi_oversold))),
        vote("deep_drawdown", below(row.drawdown, Some(thresholds.drawdown_buy))),
        vote("macd_above_signal", above(row.macd, row.macd_signal)),
        vote("golden_cross", above(row.sma50, row.sma200)),
        vote("below_lower_band", below(close, row.bb_lower)),
        vote("stoch_oversold", below(row.stoch, Some(thresholds.stoch_oversold))),
        vote("obv_rising", above(obv, row.obv_mean)),
        vote("long_trend_up", above(row.ema200, row.sma200)),
    ];

    let sell = [
        vote("rsi_overbought", above(row.rsi, Some(thresholds.rsi_overbought))),
        vote("near_peak", above(row.drawdown, Some(thresholds.drawdown_sell))),
        vote("macd_below_signal", below(row.macd, row.macd_signal)),
        vote("death_cross", below(row.sma50, row.sma200)),
        vote("above_upper_band", above(close, row.bb_upper)),
        vote("stoch_overbought", above(row.stoch, Some(thresholds.stoch_overbought))),
        vote("obv_falling", below(obv, row.obv_mean)),
        vote("long_trend_down", below(row.ema200, row.sma200)),
    ];

    ScoreBreakdown { buy, sell }
}
