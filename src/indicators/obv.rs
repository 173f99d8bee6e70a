// =============================================================================
// On-Balance Volume (OBV)
// =============================================================================
//
// Running volume total signed by the direction of the close:
//   OBV_0 = 0
//   OBV_t = OBV_{t-1} + volume_t   if close_t > close_{t-1}
//         = OBV_{t-1} - volume_t   if close_t < close_{t-1}
//         = OBV_{t-1}              otherwise

/// Advance OBV by one bar.
pub fn obv_step(prev_obv: f64, prev_close: f64, close: f64, volume: f64) -> f64 {
    if close > prev_close {
        prev_obv + volume
    } else if close < prev_close {
        prev_obv - volume
    } else {
        prev_obv
    }
}

/// Calculate the OBV series; always defined, starting at zero.
pub fn calculate_obv(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    let len = closes.len().min(volumes.len());
    let mut result = Vec::with_capacity(len);
    let mut obv = 0.0;

    for i in 0..len {
        if i > 0 {
            obv = obv_step(obv, closes[i - 1], closes[i], volumes[i]);
        }
        result.push(obv);
    }

    result
}
