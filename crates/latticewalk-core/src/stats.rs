//! Canonical summary statistics shared across the walk simulators.
//!
//! Single home for the distribution metrics every consumer reads: Shannon
//! entropy, Hamming-weight moments, the variance-scaling exponent that
//! separates diffusive from ballistic spreading, and discrete hitting times.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Entropy
// ---------------------------------------------------------------------------

/// Shannon entropy (bits) of a probability distribution.
///
/// Zero-probability entries contribute nothing; the caller owns normalization.
pub fn shannon_entropy(distribution: &[f64]) -> f64 {
    distribution
        .iter()
        .filter(|&&p| p > 1e-15)
        .map(|&p| -p * p.log2())
        .sum()
}

// ---------------------------------------------------------------------------
// Hamming-weight moments
// ---------------------------------------------------------------------------

/// Mean and variance of the Hamming-weight marginal of a hypercube
/// distribution (index = vertex, weight = popcount).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WeightMoments {
    pub mean: f64,
    pub variance: f64,
}

/// Collapse a vertex distribution to its Hamming-weight marginal moments.
pub fn hamming_weight_mean_variance(distribution: &[f64]) -> WeightMoments {
    let mut mean = 0.0;
    for (v, &p) in distribution.iter().enumerate() {
        mean += p * (v as u64).count_ones() as f64;
    }
    let mut variance = 0.0;
    for (v, &p) in distribution.iter().enumerate() {
        let w = (v as u64).count_ones() as f64;
        variance += p * (w - mean) * (w - mean);
    }
    WeightMoments { mean, variance }
}

// ---------------------------------------------------------------------------
// Variance scaling
// ---------------------------------------------------------------------------

/// Log-log least-squares slope of `variances[t]` against step `t`.
///
/// Diffusive walks scale with exponent near 1, ballistic quantum walks near 2.
/// Steps with non-positive variance (the deterministic first step of a walk
/// launched from a single vertex) are skipped; returns 0.0 when fewer than two
/// usable points remain.
pub fn variance_scaling_exponent(variances: &[f64]) -> f64 {
    let points: Vec<(f64, f64)> = variances
        .iter()
        .enumerate()
        .filter(|&(t, &v)| t >= 1 && v > 1e-15)
        .map(|(t, &v)| ((t as f64).ln(), v.ln()))
        .collect();
    if points.len() < 2 {
        return 0.0;
    }
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.0).sum::<f64>() / n;
    let my = points.iter().map(|p| p.1).sum::<f64>() / n;
    let mut num = 0.0;
    let mut den = 0.0;
    for (x, y) in points {
        num += (x - mx) * (y - my);
        den += (x - mx) * (x - mx);
    }
    if den < 1e-15 { 0.0 } else { num / den }
}

// ---------------------------------------------------------------------------
// Hitting time
// ---------------------------------------------------------------------------

/// First step at which the target position's mass reaches `threshold`.
pub fn hitting_time(distributions: &[Vec<f64>], target: usize, threshold: f64) -> Option<usize> {
    distributions
        .iter()
        .position(|dist| dist.get(target).copied().unwrap_or(0.0) >= threshold)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
