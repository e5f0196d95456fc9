//! Symbolic partitioning of embedded state spaces.
//!
//! Maps embedded points (or raw series) to discrete symbols, the alphabet the
//! transition-graph builder consumes. Four strategies: plain k-means,
//! entropy-maximizing k selection, SAX-style quantile digitization, and DBSCAN
//! density clustering. All clustering is seeded explicitly — never the
//! process-global generator — so partition selection stays reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::{EngineError, Result};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// K-means clustering output.
#[derive(Debug, Clone, Serialize)]
pub struct KmeansResult {
    /// Cluster centers in the original (de-standardized) feature space.
    pub centers: Vec<Vec<f64>>,
    /// Cluster label per input point.
    pub labels: Vec<usize>,
    /// Effective cluster count (requested count clamped to the point count).
    pub n_clusters: usize,
}

/// Entropy-maximizing partition selection output.
#[derive(Debug, Clone, Serialize)]
pub struct PartitionResult {
    /// Selected cluster count.
    pub n_clusters: usize,
    /// Centers of the winning clustering, original feature space.
    pub centers: Vec<Vec<f64>>,
    /// Label per input point under the winning clustering.
    pub labels: Vec<usize>,
    /// Shannon entropy (bits) of the winning label distribution.
    pub entropy: f64,
}

// ---------------------------------------------------------------------------
// K-means
// ---------------------------------------------------------------------------

/// Cluster embedded states into `min(n_clusters, n_points)` groups.
///
/// Features are z-score standardized before clustering so no single coordinate
/// dominates the distance metric; reported centers are mapped back to the
/// original feature space. Initial centers are `n_clusters` distinct points
/// drawn with the seeded generator, then Lloyd iterations run to convergence
/// (or 100 rounds).
pub fn kmeans_partition(states: &[Vec<f64>], n_clusters: usize, seed: u64) -> Result<KmeansResult> {
    let n = states.len();
    if n == 0 {
        return Err(EngineError::InvalidInput("no states to cluster".into()));
    }
    if n_clusters == 0 {
        return Err(EngineError::InvalidInput(
            "n_clusters must be positive".into(),
        ));
    }
    let dim = states[0].len();
    if dim == 0 || states.iter().any(|s| s.len() != dim) {
        return Err(EngineError::InvalidInput(
            "states must be non-empty rows of equal length".into(),
        ));
    }

    let k = n_clusters.min(n);
    let (std_states, means, std_devs) = standardize(states, dim);

    let mut rng = StdRng::seed_from_u64(seed);

    // Distinct random points as initial centers (partial Fisher-Yates).
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.random_range(i..n);
        indices.swap(i, j);
    }
    let mut centers: Vec<Vec<f64>> = indices[..k].iter().map(|&i| std_states[i].clone()).collect();

    let mut labels = vec![0usize; n];
    for _ in 0..100 {
        let mut changed = false;
        for (i, point) in std_states.iter().enumerate() {
            let label = nearest_center(point, &centers);
            if labels[i] != label {
                labels[i] = label;
                changed = true;
            }
        }

        let mut sums = vec![vec![0.0; dim]; k];
        let mut counts = vec![0usize; k];
        for (point, &label) in std_states.iter().zip(labels.iter()) {
            counts[label] += 1;
            for (s, &v) in sums[label].iter_mut().zip(point.iter()) {
                *s += v;
            }
        }
        for c in 0..k {
            if counts[c] == 0 {
                // Empty cluster: reseat on a random point.
                centers[c] = std_states[rng.random_range(0..n)].clone();
                changed = true;
            } else {
                for d in 0..dim {
                    centers[c][d] = sums[c][d] / counts[c] as f64;
                }
            }
        }

        if !changed {
            break;
        }
    }

    // Map centers back to the original feature space.
    let centers: Vec<Vec<f64>> = centers
        .into_iter()
        .map(|c| {
            c.into_iter()
                .enumerate()
                .map(|(d, v)| v * std_devs[d] + means[d])
                .collect()
        })
        .collect();

    Ok(KmeansResult {
        centers,
        labels,
        n_clusters: k,
    })
}

// ---------------------------------------------------------------------------
// Entropy-maximizing selection
// ---------------------------------------------------------------------------

/// Select the cluster count in `[2, min(max_bins, n_points)]` whose label
/// distribution has the highest Shannon entropy.
///
/// This is a most-informative-partition heuristic, not a density estimator:
/// label entropy tends to grow with k on near-uniform data, so the selection
/// can legitimately land on high k. Ties break toward the first (smallest) k
/// that reaches the maximum.
pub fn entropy_partition(states: &[Vec<f64>], max_bins: usize, seed: u64) -> Result<PartitionResult> {
    if states.len() < 2 {
        return Err(EngineError::InvalidInput(
            "entropy_partition needs at least 2 points".into(),
        ));
    }
    if max_bins < 2 {
        return Err(EngineError::InvalidInput(
            "max_bins must be at least 2".into(),
        ));
    }

    let upper = max_bins.min(states.len());
    let mut best: Option<PartitionResult> = None;
    for k in 2..=upper {
        let clustering = kmeans_partition(states, k, seed)?;
        let entropy = label_entropy(&clustering.labels, clustering.n_clusters);
        let better = match &best {
            Some(b) => entropy > b.entropy,
            None => true,
        };
        if better {
            best = Some(PartitionResult {
                n_clusters: clustering.n_clusters,
                centers: clustering.centers,
                labels: clustering.labels,
                entropy,
            });
        }
    }

    let result = best.ok_or_else(|| EngineError::InvalidInput("no candidate partition".into()))?;
    log::debug!(
        "entropy_partition: selected k={} with entropy {:.4} bits",
        result.n_clusters,
        result.entropy
    );
    Ok(result)
}

// ---------------------------------------------------------------------------
// SAX-style symbolic approximation
// ---------------------------------------------------------------------------

/// Digitize a raw series into `alphabet_size` symbols via empirical quantile
/// breakpoints of the z-normalized series.
pub fn symbolic_approximation(x: &[f64], alphabet_size: usize) -> Result<Vec<usize>> {
    if x.is_empty() {
        return Err(EngineError::InvalidInput("empty series".into()));
    }
    if alphabet_size < 2 {
        return Err(EngineError::InvalidInput(
            "alphabet_size must be at least 2".into(),
        ));
    }

    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let std = (x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std < 1e-12 {
        // Constant series maps to a single symbol.
        return Ok(vec![0; x.len()]);
    }
    let z: Vec<f64> = x.iter().map(|v| (v - mean) / std).collect();

    let mut sorted = z.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let breakpoints: Vec<f64> = (1..alphabet_size)
        .map(|i| sorted[(i * sorted.len() / alphabet_size).min(sorted.len() - 1)])
        .collect();

    Ok(z.iter()
        .map(|&v| breakpoints.partition_point(|&b| b <= v))
        .collect())
}

// ---------------------------------------------------------------------------
// DBSCAN
// ---------------------------------------------------------------------------

/// Density clustering with explicit noise handling.
///
/// Points in no dense region are never dropped: each noise point receives its
/// own fresh cluster id, distinct from every dense cluster and from every
/// other noise point. Downstream graph construction treats them as rare
/// symbols rather than missing data.
pub fn dbscan_partition(states: &[Vec<f64>], eps: f64, min_points: usize) -> Result<Vec<usize>> {
    if states.is_empty() {
        return Err(EngineError::InvalidInput("no states to cluster".into()));
    }
    if !(eps > 0.0) {
        return Err(EngineError::InvalidInput("eps must be positive".into()));
    }
    if min_points == 0 {
        return Err(EngineError::InvalidInput(
            "min_points must be positive".into(),
        ));
    }
    let dim = states[0].len();
    if states.iter().any(|s| s.len() != dim) {
        return Err(EngineError::InvalidInput(
            "states must be rows of equal length".into(),
        ));
    }

    const UNVISITED: usize = usize::MAX;
    const NOISE: usize = usize::MAX - 1;
    let n = states.len();
    let mut labels = vec![UNVISITED; n];
    let mut next_cluster = 0usize;

    let neighbors = |i: usize| -> Vec<usize> {
        (0..n)
            .filter(|&j| euclidean(&states[i], &states[j]) <= eps)
            .collect()
    };

    for i in 0..n {
        if labels[i] != UNVISITED {
            continue;
        }
        let seeds = neighbors(i);
        if seeds.len() < min_points {
            labels[i] = NOISE;
            continue;
        }
        let cluster = next_cluster;
        next_cluster += 1;
        labels[i] = cluster;

        let mut queue = seeds;
        let mut qi = 0;
        while qi < queue.len() {
            let j = queue[qi];
            qi += 1;
            if labels[j] == NOISE {
                labels[j] = cluster; // border point
            }
            if labels[j] != UNVISITED {
                continue;
            }
            labels[j] = cluster;
            let j_neighbors = neighbors(j);
            if j_neighbors.len() >= min_points {
                queue.extend(j_neighbors);
            }
        }
    }

    // Noise points each become their own singleton cluster.
    for label in labels.iter_mut() {
        if *label == NOISE {
            *label = next_cluster;
            next_cluster += 1;
        }
    }

    Ok(labels)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn standardize(states: &[Vec<f64>], dim: usize) -> (Vec<Vec<f64>>, Vec<f64>, Vec<f64>) {
    let n = states.len() as f64;
    let mut means = vec![0.0; dim];
    for s in states {
        for (m, &v) in means.iter_mut().zip(s.iter()) {
            *m += v;
        }
    }
    for m in means.iter_mut() {
        *m /= n;
    }
    let mut std_devs = vec![0.0; dim];
    for s in states {
        for d in 0..dim {
            std_devs[d] += (s[d] - means[d]).powi(2);
        }
    }
    for sd in std_devs.iter_mut() {
        *sd = (*sd / n).sqrt();
        if *sd < 1e-12 {
            *sd = 1.0; // constant column passes through unscaled
        }
    }
    let std_states = states
        .iter()
        .map(|s| {
            s.iter()
                .enumerate()
                .map(|(d, &v)| (v - means[d]) / std_devs[d])
                .collect()
        })
        .collect();
    (std_states, means, std_devs)
}

fn nearest_center(point: &[f64], centers: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (c, center) in centers.iter().enumerate() {
        let d = euclidean(point, center);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Shannon entropy (bits) of a label histogram.
pub(crate) fn label_entropy(labels: &[usize], n_clusters: usize) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let mut counts = vec![0usize; n_clusters];
    for &l in labels {
        if l < n_clusters {
            counts[l] += 1;
        }
    }
    let n = labels.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
