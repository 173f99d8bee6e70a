use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use tracing::{debug, info};

use crate::types::PricePoint;

// ---------------------------------------------------------------------------
// Provider approximations
// ---------------------------------------------------------------------------

/// Synthetic spread applied when a provider only reports a single price per
/// day: `high = close * (1 + spread)`, `low = close * (1 - spread)`.
const SYNTHETIC_SPREAD: f64 = 0.01;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read and parse a price series from a JSON file.
///
/// See [`parse_price_series`] for the accepted shapes.
pub fn load_price_series(path: impl AsRef<Path>) -> Result<Vec<PricePoint>> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read price series from {}", path.display()))?;

    let points = parse_price_series(&content)
        .with_context(|| format!("failed to parse price series from {}", path.display()))?;

    info!(
        path = %path.display(),
        points = points.len(),
        first = ?points.first().map(|p| p.date),
        last = ?points.last().map(|p| p.date),
        "price series loaded"
    );

    Ok(points)
}

/// Parse a price series from JSON text.
///
/// Accepted shapes:
/// ```json
/// [ { "date": "2024-01-01", "open": 1, "high": 2, "low": 0.5, "close": 1.5, "volume": 10 } ]
/// ```
/// or a market-chart payload with one price per timestamp:
/// ```json
/// { "prices": [[1704067200000, 42000.5]], "total_volumes": [[1704067200000, 1.2e10]] }
/// ```
///
/// The result is sorted by date; when two points share a date the later one
/// wins (providers append an intraday "now" sample to daily data).
pub fn parse_price_series(text: &str) -> Result<Vec<PricePoint>> {
    let root: serde_json::Value = serde_json::from_str(text).context("failed to parse price JSON")?;

    let points = if root.is_array() {
        serde_json::from_value::<Vec<PricePoint>>(root)
            .context("price array entries must carry date, open, high, low and close")?
    } else if root.get("prices").is_some() {
        parse_market_chart(&root)?
    } else {
        bail!("price JSON must be an array of points or an object with a `prices` field");
    };

    Ok(normalise(points))
}

/// Parse the `{ prices, total_volumes }` market-chart payload.
fn parse_market_chart(root: &serde_json::Value) -> Result<Vec<PricePoint>> {
    let prices = root["prices"]
        .as_array()
        .context("field prices is not an array")?;
    let volumes = root["total_volumes"].as_array();

    let mut points = Vec::with_capacity(prices.len());
    for (i, entry) in prices.iter().enumerate() {
        let ts = timestamp_ms(&entry[0]).with_context(|| format!("prices[{i}] has no timestamp"))?;
        let close = entry[1]
            .as_f64()
            .with_context(|| format!("prices[{i}] has no numeric price"))?;
        let volume = volumes
            .and_then(|v| v.get(i))
            .and_then(|v| v[1].as_f64())
            .unwrap_or(0.0);

        points.push(PricePoint {
            date: date_from_ms(ts).with_context(|| format!("prices[{i}] timestamp {ts} out of range"))?,
            open: close,
            high: close * (1.0 + SYNTHETIC_SPREAD),
            low: close * (1.0 - SYNTHETIC_SPREAD),
            close,
            volume,
        });
    }

    Ok(points)
}

/// Timestamps arrive as integers, but some payloads encode them as floats.
/// Non-finite or out-of-range floats are rejected rather than saturated.
fn timestamp_ms(val: &serde_json::Value) -> Option<i64> {
    val.as_i64().or_else(|| {
        val.as_f64()
            .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn date_from_ms(ms: i64) -> Option<NaiveDate> {
    Utc.timestamp_millis_opt(ms).single().map(|dt| dt.date_naive())
}

/// Sort by date and collapse same-day duplicates, keeping the latest sample.
fn normalise(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.sort_by_key(|p| p.date);

    let mut out: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match out.last_mut() {
            Some(last) if last.date == point.date => {
                debug!(date = %point.date, "replacing same-day price sample");
                *last = point;
            }
            _ => out.push(point),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
