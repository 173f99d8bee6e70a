// =============================================================================
// Indicator Engine — batch computation over a full price series
// =============================================================================
//
// Turns an ordered OHLCV series into one `IndicatorRow` per input point.  Each
// indicator column is produced by its pure series function, then every row is
// scored.  Row i only ever reads points 0..=i.
//
// Structural problems (empty series, non-numeric close) abort the whole
// computation; everything else degrades to `None` in the affected rows.
// =============================================================================

use crate::error::{IndicatorError, Result};
use crate::indicators::{
    calculate_bollinger, calculate_drawdown, calculate_ema, calculate_macd, calculate_obv,
    calculate_rsi, calculate_sma, calculate_stochastic, defined,
};
use crate::runtime_config::EngineConfig;
use crate::signals::score_row;
use crate::types::{IndicatorRow, PricePoint};

/// Compute indicators and scores with the default configuration.
pub fn compute(points: &[PricePoint]) -> Result<Vec<IndicatorRow>> {
    compute_with(points, &EngineConfig::default())
}

/// Compute indicators and scores with explicit windows and thresholds.
pub fn compute_with(points: &[PricePoint], config: &EngineConfig) -> Result<Vec<IndicatorRow>> {
    validate_points(points)?;
    config.validate()?;

    let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
    let highs: Vec<f64> = points.iter().map(|p| p.high).collect();
    let lows: Vec<f64> = points.iter().map(|p| p.low).collect();
    let volumes: Vec<f64> = points.iter().map(|p| p.volume).collect();

    let drawdown = calculate_drawdown(&closes);
    let rsi = calculate_rsi(&closes, config.rsi_period);
    let sma21 = calculate_sma(&closes, config.sma_short);
    let sma50 = calculate_sma(&closes, config.sma_fast);
    let sma200 = calculate_sma(&closes, config.sma_slow);
    let ema34 = calculate_ema(&closes, config.ema_mid);
    let ema200 = calculate_ema(&closes, config.ema_trend);
    let macd = calculate_macd(&closes, config.macd_fast, config.macd_slow, config.macd_signal);
    let bands = calculate_bollinger(&closes, config.bb_period, config.bb_num_std);
    let stoch = calculate_stochastic(
        &highs,
        &lows,
        &closes,
        config.stoch_period,
        config.stoch_signal_period,
    );
    let obv = calculate_obv(&closes, &volumes);
    let obv_mean = calculate_sma(&obv, config.obv_mean_period);

    let rows = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let mut row = IndicatorRow::blank(point.clone());
            row.drawdown = drawdown[i];
            row.rsi = rsi[i];
            row.sma21 = sma21[i];
            row.sma50 = sma50[i];
            row.sma200 = sma200[i];
            row.ema34 = defined(ema34[i]);
            row.ema200 = defined(ema200[i]);
            row.macd = macd.macd[i];
            row.macd_signal = macd.signal[i];
            row.macd_histogram = macd.histogram[i];
            row.bb_upper = bands[i].map(|b| b.upper);
            row.bb_middle = bands[i].map(|b| b.middle);
            row.bb_lower = bands[i].map(|b| b.lower);
            row.stoch = stoch.k[i];
            row.stoch_signal = stoch.d[i];
            row.obv = obv[i];
            row.obv_mean = obv_mean[i];

            let scores = score_row(&row, &config.thresholds);
            row.buy_score = scores.buy_score();
            row.sell_score = scores.sell_score();
            row
        })
        .collect();

    Ok(rows)
}

/// Refuse series the engine cannot compute over.
pub fn validate_points(points: &[PricePoint]) -> Result<()> {
    if points.is_empty() {
        return Err(IndicatorError::EmptyInput);
    }

    if let Some(index) = points.iter().position(|p| !p.close.is_finite()) {
        return Err(IndicatorError::MissingField { index, field: "close" });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    /// Daily points starting 2024-01-01 with `high = low = close`.
    fn series(closes: &[f64], volume: f64) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::from_close(start + Duration::days(i as i64), c, volume))
            .collect()
    }

    /// A noisy but deterministic 300-day series with OHLC spread.
    fn wavy(n: usize) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let t = i as f64;
                let close = 100.0 + 20.0 * (t / 17.0).sin() + 8.0 * (t / 5.0).cos() + t * 0.05;
                PricePoint {
                    date: start + Duration::days(i as i64),
                    open: close - 0.5,
                    high: close + 2.0 + (t / 3.0).sin().abs(),
                    low: close - 2.0 - (t / 4.0).cos().abs(),
                    close,
                    volume: 1_000.0 + 300.0 * (t / 7.0).sin(),
                }
            })
            .collect()
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(compute(&[]).unwrap_err(), IndicatorError::EmptyInput);
    }

    #[test]
    fn non_numeric_close_is_rejected() {
        let mut points = series(&[1.0, 2.0, 3.0], 10.0);
        points[1].close = f64::NAN;
        assert_eq!(
            compute(&points).unwrap_err(),
            IndicatorError::MissingField { index: 1, field: "close" }
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig {
            rsi_period: 0,
            ..EngineConfig::default()
        };
        let err = compute_with(&series(&[1.0], 1.0), &config).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidConfig(_)));
    }

    #[test]
    fn single_point_is_computed() {
        let rows = compute(&series(&[42.0], 7.0)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].drawdown, Some(0.0));
        assert_eq!(rows[0].obv, 0.0);
        assert_eq!(rows[0].ema34, Some(42.0));
        assert!(rows[0].rsi.is_none());
    }

    #[test]
    fn output_aligned_with_input() {
        let points = wavy(300);
        let rows = compute(&points).unwrap();
        assert_eq!(rows.len(), points.len());
        for (row, point) in rows.iter().zip(&points) {
            assert_eq!(&row.point, point);
        }
    }

    #[test]
    fn row_invariants_hold() {
        let points = wavy(300);
        let rows = compute(&points).unwrap();
        let mut peak = f64::NEG_INFINITY;
        for (i, row) in rows.iter().enumerate() {
            assert!(row.buy_score <= 8 && row.sell_score <= 8);
            let dd = row.drawdown.unwrap();
            assert!(dd <= 0.0);
            if row.close() >= peak {
                peak = row.close();
                assert_eq!(dd, 0.0);
            }
            if i == 0 {
                assert_eq!(row.obv, 0.0);
            } else {
                let step = row.obv - rows[i - 1].obv;
                let v = points[i].volume;
                assert!(step == v || step == -v || step == 0.0);
            }
        }
        // With 300 days every window is populated at the end.
        let last = rows.last().unwrap();
        assert!(last.sma200.is_some());
        assert!(last.macd_signal.is_some());
        assert!(last.stoch.is_some());
        assert!(last.obv_mean.is_some());
    }

    #[test]
    fn compute_is_idempotent() {
        let points = wavy(250);
        let first = compute(&points).unwrap();
        let second = compute(&points).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn prefix_rows_do_not_look_ahead() {
        let points = wavy(260);
        let full = compute(&points).unwrap();
        let prefix = compute(&points[..210]).unwrap();
        assert_eq!(&full[..210], &prefix[..]);
    }

    #[test]
    fn constant_series_converges() {
        let rows = compute(&series(&[250.0; 220], 5.0)).unwrap();
        for row in &rows[199..] {
            assert!((row.sma200.unwrap() - 250.0).abs() < 1e-10);
            assert!((row.ema200.unwrap() - 250.0).abs() < 1e-10);
        }
        assert!(rows[198].sma200.is_none());
    }

    #[test]
    fn linear_uptrend_scenario() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let rows = compute(&series(&closes, 1_000.0)).unwrap();
        let last = &rows[29];

        assert!(last.rsi.unwrap() > 50.0);
        assert!(rows.windows(2).all(|w| w[1].obv >= w[0].obv));
        assert!(rows.iter().all(|r| r.sma50.is_none() && r.sma200.is_none()));
        assert!(rows.iter().all(|r| r.drawdown == Some(0.0)));
        assert!(last.buy_score <= 2, "buy score {}", last.buy_score);
        assert!(last.sell_score > last.buy_score);
    }

    #[test]
    fn flat_series_scenario() {
        let rows = compute(&series(&[100.0; 40], 1_000.0)).unwrap();
        let last = &rows[39];

        assert!((last.rsi.unwrap() - 50.0).abs() < 1e-10);
        assert!((last.bb_upper.unwrap() - 100.0).abs() < 1e-9);
        assert!((last.bb_lower.unwrap() - 100.0).abs() < 1e-9);
        assert!(rows.iter().all(|r| r.stoch.is_none()));
        assert!(rows.iter().all(|r| r.obv == 0.0));
        assert!(last.buy_score <= 8 && last.sell_score <= 8);
    }

    #[test]
    fn custom_stochastic_window() {
        let points = wavy(60);
        let config = EngineConfig {
            stoch_period: 5,
            ..EngineConfig::default()
        };
        let rows = compute_with(&points, &config).unwrap();
        assert!(rows[3].stoch.is_none());
        assert!(rows[4].stoch.is_some());
    }

    #[test]
    fn input_is_not_mutated() {
        let points = wavy(50);
        let before = points.clone();
        let _ = compute(&points).unwrap();
        assert_eq!(points, before);
    }
}
