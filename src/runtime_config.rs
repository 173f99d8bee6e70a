// =============================================================================
// Engine Configuration — indicator windows and score thresholds
// =============================================================================
//
// Every window and threshold the engine uses lives here.  The defaults are the
// textbook parameters (RSI 14, MACD 12/26/9, Bollinger 20/2σ, Stochastic 14/3)
// and the thresholds of the 8-vote buy / sell scores.
//
// All fields carry `#[serde(default)]` so a partial JSON file only overrides
// what it names.  Persistence uses an atomic tmp + rename write.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::IndicatorError;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_rsi_period() -> usize {
    14
}

fn default_sma_short() -> usize {
    21
}

fn default_sma_fast() -> usize {
    50
}

fn default_sma_slow() -> usize {
    200
}

fn default_ema_mid() -> usize {
    34
}

fn default_ema_trend() -> usize {
    200
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_bb_period() -> usize {
    20
}

fn default_bb_num_std() -> f64 {
    2.0
}

fn default_stoch_period() -> usize {
    14
}

fn default_stoch_signal_period() -> usize {
    3
}

fn default_obv_mean_period() -> usize {
    14
}

fn default_rsi_oversold() -> f64 {
    30.0
}

fn default_rsi_overbought() -> f64 {
    70.0
}

fn default_drawdown_buy() -> f64 {
    -0.10
}

fn default_drawdown_sell() -> f64 {
    -0.01
}

fn default_stoch_oversold() -> f64 {
    20.0
}

fn default_stoch_overbought() -> f64 {
    80.0
}

// =============================================================================
// ScoreThresholds
// =============================================================================

/// Levels used by the threshold votes of the buy / sell scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    /// Buy vote when RSI is strictly below this level.
    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,

    /// Sell vote when RSI is strictly above this level.
    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,

    /// Buy vote when drawdown is strictly below this fraction.
    #[serde(default = "default_drawdown_buy")]
    pub drawdown_buy: f64,

    /// Sell vote when drawdown is strictly above this fraction (near the peak).
    #[serde(default = "default_drawdown_sell")]
    pub drawdown_sell: f64,

    #[serde(default = "default_stoch_oversold")]
    pub stoch_oversold: f64,

    #[serde(default = "default_stoch_overbought")]
    pub stoch_overbought: f64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: default_rsi_oversold(),
            rsi_overbought: default_rsi_overbought(),
            drawdown_buy: default_drawdown_buy(),
            drawdown_sell: default_drawdown_sell(),
            stoch_oversold: default_stoch_oversold(),
            stoch_overbought: default_stoch_overbought(),
        }
    }
}

// =============================================================================
// EngineConfig
// =============================================================================

/// Windows and thresholds for the indicator engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    // --- Momentum -----------------------------------------------------------

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_stoch_period")]
    pub stoch_period: usize,

    /// Smoothing window of %D over %K.
    #[serde(default = "default_stoch_signal_period")]
    pub stoch_signal_period: usize,

    // --- Moving averages ----------------------------------------------------

    #[serde(default = "default_sma_short")]
    pub sma_short: usize,

    #[serde(default = "default_sma_fast")]
    pub sma_fast: usize,

    #[serde(default = "default_sma_slow")]
    pub sma_slow: usize,

    #[serde(default = "default_ema_mid")]
    pub ema_mid: usize,

    /// Span of the long EMA compared against the slow SMA by the trend-filter
    /// vote.
    #[serde(default = "default_ema_trend")]
    pub ema_trend: usize,

    // --- MACD ---------------------------------------------------------------

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    // --- Volatility & volume ------------------------------------------------

    #[serde(default = "default_bb_period")]
    pub bb_period: usize,

    #[serde(default = "default_bb_num_std")]
    pub bb_num_std: f64,

    /// Trailing window of the OBV mean the volume vote compares against.
    #[serde(default = "default_obv_mean_period")]
    pub obv_mean_period: usize,

    // --- Scoring ------------------------------------------------------------

    #[serde(default)]
    pub thresholds: ScoreThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            stoch_period: default_stoch_period(),
            stoch_signal_period: default_stoch_signal_period(),
            sma_short: default_sma_short(),
            sma_fast: default_sma_fast(),
            sma_slow: default_sma_slow(),
            ema_mid: default_ema_mid(),
            ema_trend: default_ema_trend(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bb_period: default_bb_period(),
            bb_num_std: default_bb_num_std(),
            obv_mean_period: default_obv_mean_period(),
            thresholds: ScoreThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse engine config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("rejected engine config from {}", path.display()))?;

        info!(
            path = %path.display(),
            rsi_period = config.rsi_period,
            stoch_period = config.stoch_period,
            "engine config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise engine config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "engine config saved (atomic)");
        Ok(())
    }

    /// Reject configurations whose windows would make an indicator
    /// meaningless.
    pub fn validate(&self) -> std::result::Result<(), IndicatorError> {
        let windows = [
            ("rsi_period", self.rsi_period),
            ("stoch_period", self.stoch_period),
            ("stoch_signal_period", self.stoch_signal_period),
            ("sma_short", self.sma_short),
            ("sma_fast", self.sma_fast),
            ("sma_slow", self.sma_slow),
            ("ema_mid", self.ema_mid),
            ("ema_trend", self.ema_trend),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bb_period", self.bb_period),
            ("obv_mean_period", self.obv_mean_period),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(IndicatorError::InvalidConfig(format!("{name} must be at least 1")));
        }

        if self.macd_fast >= self.macd_slow {
            return Err(IndicatorError::InvalidConfig(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }

        if !self.bb_num_std.is_finite() || self.bb_num_std < 0.0 {
            return Err(IndicatorError::InvalidConfig(format!(
                "bb_num_std must be a non-negative number, got {}",
                self.bb_num_std
            )));
        }

        Ok(())
    }

    /// Longest close window any indicator needs to keep.
    pub fn max_close_window(&self) -> usize {
        self.sma_short
            .max(self.sma_fast)
            .max(self.sma_slow)
            .max(self.bb_period)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_textbook_parameters() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.rsi_period, 14);
        assert_eq!((cfg.macd_fast, cfg.macd_slow, cfg.macd_signal), (12, 26, 9));
        assert_eq!(cfg.bb_period, 20);
        assert!((cfg.bb_num_std - 2.0).abs() < f64::EPSILON);
        assert_eq!(cfg.stoch_period, 14);
        assert_eq!(cfg.sma_slow, 200);
        assert_eq!(cfg.ema_trend, 200);
        assert!((cfg.thresholds.drawdown_buy + 0.10).abs() < f64::EPSILON);
        assert!((cfg.thresholds.drawdown_sell + 0.01).abs() < f64::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "stoch_period": 5, "thresholds": { "rsi_oversold": 25.0 } }"#;
        let cfg: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.stoch_period, 5);
        assert_eq!(cfg.rsi_period, 14);
        assert!((cfg.thresholds.rsi_oversold - 25.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.rsi_overbought - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_zero_window() {
        let cfg = EngineConfig {
            bb_period: 0,
            ..EngineConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidConfig(msg) if msg.contains("bb_period")));
    }

    #[test]
    fn validate_rejects_inverted_macd() {
        let cfg = EngineConfig {
            macd_fast: 26,
            macd_slow: 12,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "signal_engine_config_{}.json",
            std::process::id()
        ));
        let cfg = EngineConfig {
            rsi_period: 10,
            ..EngineConfig::default()
        };
        cfg.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(EngineConfig::load("/nonexistent/engine_config.json").is_err());
    }
}
