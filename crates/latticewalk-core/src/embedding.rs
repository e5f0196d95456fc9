//! Phase-space reconstruction from scalar time series.
//!
//! Takens' theorem: the attractor of a dynamical system can be reconstructed
//! from time-delayed copies of a single observable. This module estimates the
//! two embedding parameters (delay via autocorrelation decay, dimension via
//! false nearest neighbors) and builds the delay-coordinate matrix.

use crate::error::{EngineError, Result};

// ---------------------------------------------------------------------------
// Delay estimation
// ---------------------------------------------------------------------------

/// Estimate the embedding delay as the first lag whose absolute
/// autocorrelation drops below 1/e.
///
/// Always terminates with a usable value: if no lag in `1..=max_lag` crosses
/// the threshold, falls back to `max(1, max_lag / 10)`. A heuristic, not an
/// exact method — it never errors.
pub fn auto_delay(x: &[f64], max_lag: usize) -> usize {
    let n = x.len();
    let fallback = (max_lag / 10).max(1);
    if n < 2 || max_lag == 0 {
        return fallback;
    }

    let mean = x.iter().sum::<f64>() / n as f64;
    let var: f64 = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    if var < 1e-12 {
        // Constant series: every lag is perfectly correlated.
        return fallback;
    }

    let threshold = 1.0 / std::f64::consts::E;
    for lag in 1..=max_lag.min(n - 1) {
        let count = n - lag;
        let mut sum = 0.0;
        for i in 0..count {
            sum += (x[i] - mean) * (x[i + lag] - mean);
        }
        let corr = sum / (count as f64 * var);
        if corr.abs() < threshold {
            log::debug!("auto_delay: lag {lag} autocorrelation {corr:.4} below 1/e");
            return lag;
        }
    }
    fallback
}

// ---------------------------------------------------------------------------
// Embedding dimension estimation
// ---------------------------------------------------------------------------

/// Estimate the embedding dimension via the false-nearest-neighbors criterion.
///
/// For each candidate dimension, embeds the series, finds every point's
/// nearest neighbor, and measures how much that distance grows when one more
/// delay coordinate is added. Returns the first dimension where the median
/// growth ratio falls below `rtol`, else `max_dim`. Degenerates gracefully
/// (returns the current dimension) once fewer than 10 embedded points remain.
pub fn false_nearest_neighbors(x: &[f64], max_dim: usize, delay: usize, rtol: f64) -> usize {
    let delay = delay.max(1);
    let max_dim = max_dim.max(1);

    for dim in 1..max_dim {
        // Points usable in both the dim and dim+1 embeddings.
        let n_rows = match x.len().checked_sub(delay * dim) {
            Some(r) if r >= 10 => r,
            _ => {
                log::debug!("false_nearest_neighbors: too few points at dim {dim}, stopping");
                return dim;
            }
        };

        let mut ratios = Vec::with_capacity(n_rows);
        for i in 0..n_rows {
            // Nearest neighbor in dim-space over the shared index range.
            let mut best = f64::INFINITY;
            let mut best_j = i;
            for j in 0..n_rows {
                if j == i {
                    continue;
                }
                let mut d2 = 0.0;
                for k in 0..dim {
                    let diff = x[i + k * delay] - x[j + k * delay];
                    d2 += diff * diff;
                }
                if d2 < best {
                    best = d2;
                    best_j = j;
                }
            }
            let dist = best.sqrt();
            if dist < 1e-12 {
                continue; // coincident points carry no growth information
            }
            let extra = (x[i + dim * delay] - x[best_j + dim * delay]).abs();
            let grown = (best + extra * extra).sqrt();
            ratios.push(grown / dist);
        }

        if ratios.is_empty() {
            return dim;
        }
        ratios.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = ratios[ratios.len() / 2];
        if median < rtol {
            log::debug!("false_nearest_neighbors: dim {dim} median growth {median:.4} < {rtol}");
            return dim;
        }
    }
    max_dim
}

// ---------------------------------------------------------------------------
// Takens embedding
// ---------------------------------------------------------------------------

/// Build the delay-coordinate matrix of shape `(N − delay·(dim−1), dim)`.
///
/// Row `i` is `[x[i], x[i+delay], ..., x[i+(dim−1)·delay]]`. Fails with
/// [`EngineError::SeriesTooShort`] when the requested parameters leave fewer
/// than one usable row — never returns a truncated or empty embedding.
pub fn takens_embedding(x: &[f64], delay: usize, dim: usize) -> Result<Vec<Vec<f64>>> {
    if delay == 0 || dim == 0 {
        return Err(EngineError::InvalidInput(format!(
            "delay and dim must be positive, got delay={delay}, dim={dim}"
        )));
    }
    let span = delay * (dim - 1);
    if x.len() <= span {
        return Err(EngineError::SeriesTooShort {
            needed: span + 1,
            actual: x.len(),
        });
    }

    let n_rows = x.len() - span;
    let mut rows = Vec::with_capacity(n_rows);
    for i in 0..n_rows {
        let mut row = Vec::with_capacity(dim);
        for k in 0..dim {
            row.push(x[i + k * delay]);
        }
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
