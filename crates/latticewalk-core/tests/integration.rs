//! Integration tests for latticewalk-core.
//!
//! These tests verify the full pipelines end to end:
//! series → embedding → partition → transition graph, and
//! features → hypercube encoder → walk simulation → summary statistics.

use std::collections::BTreeMap;

use latticewalk_core::walk::{
    HypercubeCoin, NoiseChannelKind, NoiseSpec, NoiseTarget, NoisyWalkConfig,
    classical_hypercube_time_series, noisy_coined_walk, quantum_hypercube_time_series,
};
use latticewalk_core::{
    FeatureBin, HypercubeEncoder, auto_delay, build_transition_graph, entropy_partition,
    false_nearest_neighbors, hamming_weight_mean_variance, normalize_graph, takens_embedding,
    validate_graph, variance_scaling_exponent,
};

/// Deterministic noisy sine, the canonical discretization input.
fn noisy_sine(n: usize) -> Vec<f64> {
    let mut state: u64 = 0xDEAD_BEEF_CAFE_BABE;
    (0..n)
        .map(|t| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let noise = ((state >> 33) as f64 / (1u64 << 31) as f64 - 0.5) * 0.2;
            (t as f64 * 0.15).sin() + noise
        })
        .collect()
}

#[test]
fn series_to_markov_chain_pipeline() {
    let series = noisy_sine(600);

    let delay = auto_delay(&series, 60);
    assert!(delay >= 1);
    let dim = false_nearest_neighbors(&series, 6, delay, 10.0);
    assert!((1..=6).contains(&dim));

    let states = takens_embedding(&series, delay, dim).unwrap();
    assert_eq!(states.len(), series.len() - (dim - 1) * delay);
    assert!(states.iter().all(|s| s.len() == dim));

    let partition = entropy_partition(&states, 6, 7).unwrap();
    assert!(partition.n_clusters >= 2);
    assert_eq!(partition.labels.len(), states.len());
    assert!(partition.entropy > 0.0);

    let graph = build_transition_graph(&partition.labels, true).unwrap();
    let chain = normalize_graph(&graph);
    let report = validate_graph(&chain, &partition.labels);
    assert!(report.covers_symbols);
    assert!(report.connected);
    assert!(report.max_row_sum <= 1.0 + 1e-9);
    assert!(report.min_row_sum >= 0.0);
}

#[test]
fn features_to_walk_pipeline() {
    // Two 2-bit features -> 4-cube.
    let encoder = HypercubeEncoder::new(vec![
        FeatureBin::new("rate", vec![1.0, 2.0, 3.0], Some(0.0), Some(4.0)).unwrap(),
        FeatureBin::new("load", vec![10.0, 20.0, 30.0], Some(0.0), Some(40.0)).unwrap(),
    ])
    .unwrap();
    assert_eq!(encoder.total_bits(), 4);

    let record: BTreeMap<String, f64> =
        [("rate".to_string(), 2.5), ("load".to_string(), 15.0)].into();
    let start = encoder.encode(&record).unwrap();
    assert!(start < encoder.vertex_count());

    let steps = 7;
    let classical = classical_hypercube_time_series(encoder.total_bits(), steps, start).unwrap();
    let quantum =
        quantum_hypercube_time_series(encoder.total_bits(), steps, start, &HypercubeCoin::Hadamard)
            .unwrap();
    for series in [&classical, &quantum] {
        assert_eq!(series.len(), steps + 1);
        for row in series.iter() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    let c_var = hamming_weight_mean_variance(&classical[steps]).variance;
    let q_var = hamming_weight_mean_variance(&quantum[steps]).variance;
    assert!(q_var > 0.0);
    assert!(c_var > 0.0);
}

#[test]
fn classical_walk_is_diffusive_before_saturation() {
    // A 4-cube saturates too fast for a scaling fit; the 8-cube stays in the
    // growth regime for the first 7 steps.
    let series = classical_hypercube_time_series(8, 7, 0).unwrap();
    let variances: Vec<f64> = series
        .iter()
        .map(|row| hamming_weight_mean_variance(row).variance)
        .collect();
    let alpha = variance_scaling_exponent(&variances);
    assert!(alpha > 0.8 && alpha < 1.5, "alpha={alpha}");
}

#[test]
fn noisy_walk_with_hitting_target() {
    let mut config = NoisyWalkConfig::new(6, 10);
    config.noise = vec![NoiseSpec {
        kind: NoiseChannelKind::Depolarizing,
        strength: 0.2,
        target: NoiseTarget::All,
    }];
    config.hitting_target = Some(0);
    config.hitting_threshold = 0.0;
    let result = noisy_coined_walk(&config).unwrap();

    assert_eq!(result.positions, (0..6).collect::<Vec<_>>());
    assert_eq!(result.distributions.len(), 11);
    assert_eq!(result.entropies.len(), 11);
    // Threshold 0 trips at step 0.
    assert_eq!(result.hitting_time, Some(0));
    for dist in &result.distributions {
        let sum: f64 = dist.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}

#[test]
fn results_serialize_to_json() {
    let series = noisy_sine(300);
    let partition = entropy_partition(
        &takens_embedding(&series, 3, 2).unwrap(),
        4,
        1,
    )
    .unwrap();
    let json = serde_json::to_value(&partition).unwrap();
    assert!(json.get("n_clusters").is_some());
    assert!(json.get("entropy").is_some());

    let graph = build_transition_graph(&partition.labels, true).unwrap();
    let report = validate_graph(&normalize_graph(&graph), &partition.labels);
    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("connected").is_some());

    let result = noisy_coined_walk(&NoisyWalkConfig::new(4, 3)).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["coin"], "hadamard");
    assert!(json["distributions"].as_array().unwrap().len() == 4);
}
