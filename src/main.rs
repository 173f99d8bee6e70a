// =============================================================================
// Signal Engine — command-line report
// =============================================================================
//
// Usage: signal-engine <series.json> [--json] [--tail N] [--config FILE]
//
// Loads the engine config (--config or SIGNAL_ENGINE_CONFIG, default
// engine_config.json), computes indicators over the price series, and prints
// the most recent rows.
// =============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use signal_engine::market_data::load_price_series;
use signal_engine::{compute_with, score_row, EngineConfig, IndicatorRow};

#[derive(Parser, Debug)]
#[command(
    name = "signal-engine",
    about = "Technical-indicator buy / sell scores for a daily price series"
)]
struct Cli {
    /// Path to the price series JSON (point array or market-chart payload)
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    series_path: PathBuf,

    /// Print rows as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Number of most recent rows to print
    #[arg(long, default_value_t = 30)]
    tail: usize,

    /// Engine config JSON; defaults are used when it cannot be loaded
    #[arg(long, env = "SIGNAL_ENGINE_CONFIG", default_value = "engine_config.json")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = EngineConfig::load(&cli.config).unwrap_or_else(|e| {
        warn!(error = %e, path = %cli.config.display(), "Failed to load config, using defaults");
        EngineConfig::default()
    });

    let points = load_price_series(&cli.series_path)?;
    let rows = compute_with(&points, &config)
        .with_context(|| format!("cannot compute indicators for {}", cli.series_path.display()))?;

    let tail = &rows[rows.len().saturating_sub(cli.tail)..];
    if cli.json {
        println!("{}", serde_json::to_string_pretty(tail)?);
    } else {
        print_table(tail);
    }

    if let Some(last) = rows.last() {
        let breakdown = score_row(last, &config.thresholds);
        info!(
            date = %last.date(),
            close = last.close(),
            buy_score = last.buy_score,
            sell_score = last.sell_score,
            buy_votes = ?breakdown.active_buy(),
            sell_votes = ?breakdown.active_sell(),
            "latest score"
        );
    }

    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn print_table(rows: &[IndicatorRow]) {
    println!(
        "{:<10} {:>12} {:>8} {:>7} {:>10} {:>10} {:>12} {:>12} {:>7} {:>14} {:>3} {:>4}",
        "date", "close", "dd%", "rsi", "macd", "signal", "bb_lower", "bb_upper", "stoch", "obv", "buy", "sell"
    );
    for row in rows {
        println!(
            "{:<10} {:>12.2} {:>8} {:>7} {:>10} {:>10} {:>12} {:>12} {:>7} {:>14.0} {:>3} {:>4}",
            row.date(),
            row.close(),
            fmt_opt(row.drawdown.map(|d| d * 100.0)),
            fmt_opt(row.rsi),
            fmt_opt(row.macd),
            fmt_opt(row.macd_signal),
            fmt_opt(row.bb_lower),
            fmt_opt(row.bb_upper),
            fmt_opt(row.stoch),
            row.obv,
            row.buy_score,
            row.sell_score,
        );
    }
}
