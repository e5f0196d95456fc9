//! # latticewalk-core
//!
//! **Turn a scalar time series into a structure you can walk on.**
//!
//! `latticewalk-core` discretizes continuous time series into dynamical-systems
//! representations (delay embedding → symbolic partition → transition graph) and
//! fixed combinatorial structures (Boolean hypercubes), then simulates classical
//! and quantum random walks — including decohering quantum walks — over them.
//!
//! ## Quick Start
//!
//! ```
//! use latticewalk_core::walk::{classical_hypercube_time_series, quantum_hypercube_time_series};
//! use latticewalk_core::walk::HypercubeCoin;
//!
//! // Diffusive spreading on the 3-cube from vertex 0.
//! let classical = classical_hypercube_time_series(3, 5, 0).unwrap();
//!
//! // Ballistic spreading with the Grover coin.
//! let quantum = quantum_hypercube_time_series(3, 5, 0, &HypercubeCoin::Grover).unwrap();
//!
//! // Every row is a probability distribution over the 8 vertices.
//! assert!((classical[5].iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! assert!((quantum[5].iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```
//!
//! ## Architecture
//!
//! Series → Embedding → Partition → Transition graph   (classical diffusion model)
//! Features → Hypercube encoder → Classical / quantum / noisy walks
//!
//! Every simulation call is a pure function of its inputs: state arrays are
//! created per call and released on return, no hidden shared mutable state.
//! State size grows as `2^dimensions` (amplitude walks) and as the square of
//! that for density-matrix walks — callers own the capacity bound.

pub mod embedding;
pub mod encoder;
pub mod error;
pub mod graph;
pub mod lie;
pub mod partition;
pub mod stats;
pub mod walk;

pub use embedding::{auto_delay, false_nearest_neighbors, takens_embedding};
pub use encoder::{FeatureBin, HypercubeEncoder};
pub use error::{EngineError, Result};
pub use graph::{GraphValidation, TransitionGraph, build_transition_graph, normalize_graph, validate_graph};
pub use lie::lie_penalty;
pub use partition::{
    KmeansResult, PartitionResult, dbscan_partition, entropy_partition, kmeans_partition,
    symbolic_approximation,
};
pub use stats::{
    hamming_weight_mean_variance, hitting_time, shannon_entropy, variance_scaling_exponent,
};
pub use walk::{
    CoinCallback, HypercubeCoin, NoiseChannelKind, NoiseSpec, NoiseTarget, NoisyQuantumWalkResult,
    NoisyWalkConfig, WalkTopology, WeightFn, adaptive_quantum_hypercube_time_series,
    classical_hypercube_time_series, noisy_coined_walk, quantum_hypercube_time_series,
    simulate_walk,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
