//! Forward log-return label.
//!
//! `target[t] = ln(adj_close[t+h] / adj_close[t])` for every t where t+h is
//! in range. The returned column only covers that decidable prefix — the
//! final `h` rows of the input have no label and drop out of everything
//! downstream. Pure function; recomputed on every simulation call so the
//! result depends only on the input table.

/// Compute the forward log-return label for a fixed lookahead.
///
/// Returns a vector of length `max(len − horizon, 0)`. Non-positive or NaN
/// prices yield NaN labels rather than panicking.
pub fn forward_log_returns(adj_close: &[f64], horizon: usize) -> Vec<f64> {
    let n = adj_close.len();
    if horizon == 0 || n <= horizon {
        return Vec::new();
    }
    (0..n - horizon)
        .map(|t| {
            let now = adj_close[t];
            let ahead = adj_close[t + horizon];
            if now > 0.0 && ahead > 0.0 {
                (ahead / now).ln()
            } else {
                f64::NAN
            }
        })
        .collect()
}
