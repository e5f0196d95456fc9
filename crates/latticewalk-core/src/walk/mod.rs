//! Walk simulators over hypercubes and small graphs.
//!
//! Three engines, one contract: every simulator returns a time-indexed series
//! of occupation-probability distributions, rows summing to 1 within numerical
//! epsilon.
//!
//! - [`classical`]: degree-regular diffusion on the Boolean hypercube, plus an
//!   adaptive graph walk with caller-supplied multiplicative reweighting.
//! - [`quantum`]: coined unitary walks (static or per-step-adaptive coin).
//! - [`noisy`]: density-matrix propagation under configurable single-qubit
//!   noise channels on a cycle or path graph.

pub mod classical;
pub mod noisy;
pub mod quantum;

pub use classical::{WeightFn, classical_hypercube_time_series, simulate_walk};
pub use noisy::{
    NoiseChannelKind, NoiseSpec, NoiseTarget, NoisyQuantumWalkResult, NoisyWalkConfig,
    WalkTopology, noisy_coined_walk,
};
pub use quantum::{
    CoinCallback, HypercubeCoin, adaptive_quantum_hypercube_time_series,
    quantum_hypercube_time_series,
};

use crate::error::{EngineError, Result};

/// Hard capacity contract: amplitude walks allocate `2^dimensions` states per
/// coin channel, so the hypercube dimension is capped rather than left to
/// exhaust memory.
pub const MAX_HYPERCUBE_DIMENSIONS: u32 = 20;

pub(crate) fn check_hypercube_dimensions(dimensions: u32) -> Result<u64> {
    if dimensions == 0 {
        return Err(EngineError::InvalidInput(
            "hypercube dimensions must be positive".into(),
        ));
    }
    if dimensions > MAX_HYPERCUBE_DIMENSIONS {
        return Err(EngineError::Unsupported(format!(
            "hypercube dimension {dimensions} exceeds the cap of {MAX_HYPERCUBE_DIMENSIONS}"
        )));
    }
    Ok(1u64 << dimensions)
}

pub(crate) fn check_start_vertex(start: u64, vertex_count: u64) -> Result<()> {
    if start >= vertex_count {
        return Err(EngineError::InvalidInput(format!(
            "start vertex {start} outside the {vertex_count}-vertex space"
        )));
    }
    Ok(())
}
