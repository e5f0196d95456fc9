//! Classical random walks on the Boolean hypercube.
//!
//! The fixed-degree walk is the canonical degree-regular diffusion operator:
//! each step splits every vertex's mass equally across its bit-flip neighbors.
//! The adaptive walk layers a caller-supplied multiplicative reweighting over
//! the same Hamming-1 neighbor set, enabling state-dependent drift.

use std::collections::BTreeMap;

use crate::error::{EngineError, Result};
use crate::walk::{check_hypercube_dimensions, check_start_vertex};

/// Strategy callback for the adaptive walk.
///
/// Contract: given the current vertex, return multiplicative weight
/// adjustments keyed by neighbor vertex. Neighbors absent from the map keep
/// their base weight; multipliers apply before renormalization.
pub type WeightFn = dyn Fn(u64) -> BTreeMap<u64, f64>;

// ---------------------------------------------------------------------------
// Fixed-degree diffusion
// ---------------------------------------------------------------------------

/// Unbiased diffusion on the `dimensions`-cube from a point mass at `start`.
///
/// Returns `steps + 1` rows (the initial distribution included), each a
/// probability distribution over the `2^dimensions` vertices.
pub fn classical_hypercube_time_series(
    dimensions: u32,
    steps: usize,
    start: u64,
) -> Result<Vec<Vec<f64>>> {
    let n = check_hypercube_dimensions(dimensions)?;
    check_start_vertex(start, n)?;

    let mut current = vec![0.0; n as usize];
    current[start as usize] = 1.0;
    let mut series = Vec::with_capacity(steps + 1);
    series.push(current.clone());

    for _ in 0..steps {
        let mut next = vec![0.0; n as usize];
        let share = 1.0 / dimensions as f64;
        for (v, &mass) in current.iter().enumerate() {
            if mass == 0.0 {
                continue;
            }
            let split = mass * share;
            for k in 0..dimensions {
                next[v ^ (1usize << k)] += split;
            }
        }
        current = next;
        series.push(current.clone());
    }
    Ok(series)
}

// ---------------------------------------------------------------------------
// Adaptive graph walk
// ---------------------------------------------------------------------------

/// Hypercube walk with optional state-dependent edge reweighting.
///
/// Every vertex's neighbor set is its `total_bits` Hamming-1 neighbors with
/// base weight 1. When `weight_fn` is supplied, each neighbor's weight is
/// multiplied by the returned adjustment before the row is renormalized to
/// sum to 1. A vertex whose adapted weights sum to ≤ 0 has no valid
/// transition and fails the simulation.
pub fn simulate_walk(
    total_bits: u32,
    steps: usize,
    start: u64,
    weight_fn: Option<&WeightFn>,
) -> Result<Vec<Vec<f64>>> {
    let n = check_hypercube_dimensions(total_bits)?;
    check_start_vertex(start, n)?;

    let mut current = vec![0.0; n as usize];
    current[start as usize] = 1.0;
    let mut series = Vec::with_capacity(steps + 1);
    series.push(current.clone());

    for _ in 0..steps {
        let mut next = vec![0.0; n as usize];
        for (v, &mass) in current.iter().enumerate() {
            if mass == 0.0 {
                continue;
            }
            let adjustments = weight_fn.map(|f| f(v as u64));
            let mut weights = Vec::with_capacity(total_bits as usize);
            let mut total = 0.0;
            for k in 0..total_bits {
                let neighbor = v as u64 ^ (1u64 << k);
                let mut w = 1.0;
                if let Some(adj) = &adjustments {
                    if let Some(&m) = adj.get(&neighbor) {
                        w *= m;
                    }
                }
                total += w;
                weights.push((neighbor, w));
            }
            if total <= 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "vertex {v} has non-positive total transition weight {total}"
                )));
            }
            for (neighbor, w) in weights {
                next[neighbor as usize] += mass * w / total;
            }
        }
        current = next;
        series.push(current.clone());
    }
    Ok(series)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
