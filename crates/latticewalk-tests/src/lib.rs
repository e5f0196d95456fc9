//! Simulation invariant battery for the latticewalk engine.
//!
//! Provides graded checks over the discretization pipeline and the walk
//! simulators: probability conservation, encoder round trips, Hamming
//! adjacency, row-stochasticity, diffusive vs ballistic scaling, and
//! decoherence behavior. Each check returns a [`CheckResult`] with a pass/fail
//! determination, a letter grade (A through F), and — where a statistical test
//! applies — a p-value.

use latticewalk_core::walk::{
    HypercubeCoin, NoiseChannelKind, NoiseSpec, NoiseTarget, NoisyWalkConfig,
    classical_hypercube_time_series, noisy_coined_walk, quantum_hypercube_time_series,
};
use latticewalk_core::{
    FeatureBin, HypercubeEncoder, build_transition_graph, entropy_partition,
    hamming_weight_mean_variance, kmeans_partition, normalize_graph, shannon_entropy,
    symbolic_approximation, validate_graph, variance_scaling_exponent,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::collections::BTreeMap;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a single invariant check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl CheckResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold (default 0.01).
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }
}

fn failure(name: &str, details: String) -> CheckResult {
    CheckResult {
        name: name.to_string(),
        passed: false,
        p_value: None,
        statistic: 0.0,
        details,
        grade: 'F',
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════════════════════════

/// Noisy sine series, the canonical discretization input.
fn noisy_sine(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|t| (t as f64 * 0.2).sin() + rng.random_range(-0.1..0.1))
        .collect()
}

/// Two well-separated 2D clusters for partition checks.
fn bimodal_states(per_cluster: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut states = Vec::with_capacity(per_cluster * 2);
    for center in [0.0f64, 5.0] {
        for _ in 0..per_cluster {
            states.push(vec![
                center + rng.random_range(-0.5..0.5),
                center + rng.random_range(-0.5..0.5),
            ]);
        }
    }
    states
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. WALK INVARIANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Check 1: Probability conservation -- every row of every simulator output
/// must sum to 1.
pub fn probability_conservation() -> CheckResult {
    let name = "Probability Conservation";
    let runs: [Result<Vec<Vec<f64>>, _>; 3] = [
        classical_hypercube_time_series(4, 10, 0),
        quantum_hypercube_time_series(4, 10, 0, &HypercubeCoin::Hadamard),
        quantum_hypercube_time_series(3, 10, 0, &HypercubeCoin::Grover),
    ];
    let mut max_dev = 0.0f64;
    for run in runs {
        let series = match run {
            Ok(s) => s,
            Err(e) => return failure(name, format!("simulation failed: {e}")),
        };
        for row in &series {
            let sum: f64 = row.iter().sum();
            max_dev = max_dev.max((sum - 1.0).abs());
        }
    }
    let grade = if max_dev < 1e-12 {
        'A'
    } else if max_dev < 1e-9 {
        'B'
    } else if max_dev < 1e-6 {
        'C'
    } else if max_dev < 1e-3 {
        'D'
    } else {
        'F'
    };
    CheckResult {
        name: name.to_string(),
        passed: max_dev < 1e-6,
        p_value: None,
        statistic: max_dev,
        details: format!("max |row_sum - 1| = {max_dev:.2e}"),
        grade,
    }
}

/// Check 2: Diffusive scaling -- classical hypercube variance grows with
/// exponent near 1.
pub fn diffusion_scaling() -> CheckResult {
    let name = "Diffusion Scaling";
    let series = match classical_hypercube_time_series(8, 7, 0) {
        Ok(s) => s,
        Err(e) => return failure(name, format!("simulation failed: {e}")),
    };
    let variances: Vec<f64> = series
        .iter()
        .map(|row| hamming_weight_mean_variance(row).variance)
        .collect();
    let alpha = variance_scaling_exponent(&variances);
    let dev = (alpha - 1.0).abs();
    let grade = if dev < 0.2 {
        'A'
    } else if dev < 0.35 {
        'B'
    } else if dev < 0.5 {
        'C'
    } else if dev < 0.7 {
        'D'
    } else {
        'F'
    };
    CheckResult {
        name: name.to_string(),
        passed: dev < 0.5,
        p_value: None,
        statistic: alpha,
        details: format!("alpha={alpha:.3} (diffusive ~ 1)"),
        grade,
    }
}

/// Check 3: Ballistic concentration -- the coined quantum walk piles more mass
/// onto its peak vertex than classical diffusion.
pub fn ballistic_concentration() -> CheckResult {
    let name = "Ballistic Concentration";
    let step = 6;
    let quantum = match quantum_hypercube_time_series(4, step, 0, &HypercubeCoin::Hadamard) {
        Ok(s) => s,
        Err(e) => return failure(name, format!("quantum walk failed: {e}")),
    };
    let classical = match classical_hypercube_time_series(4, step, 0) {
        Ok(s) => s,
        Err(e) => return failure(name, format!("classical walk failed: {e}")),
    };
    let q_max = quantum[step].iter().cloned().fold(0.0, f64::max);
    let c_max = classical[step].iter().cloned().fold(0.0, f64::max);
    let ratio = q_max / c_max.max(1e-15);
    let grade = if ratio > 2.0 {
        'A'
    } else if ratio > 1.5 {
        'B'
    } else if ratio > 1.1 {
        'C'
    } else if ratio > 1.0 {
        'D'
    } else {
        'F'
    };
    CheckResult {
        name: name.to_string(),
        passed: ratio > 1.0,
        p_value: None,
        statistic: ratio,
        details: format!("q_peak={q_max:.4} vs c_peak={c_max:.4} at step {step}"),
        grade,
    }
}

/// Check 4: Decoherence entropy -- stronger phase damping never lowers the
/// per-step distribution entropy.
pub fn decoherence_entropy() -> CheckResult {
    let name = "Decoherence Entropy";
    let run = |strength: f64| {
        let mut config = NoisyWalkConfig::new(4, 6);
        config.noise = vec![NoiseSpec {
            kind: NoiseChannelKind::PhaseDamping,
            strength,
            target: NoiseTarget::All,
        }];
        noisy_coined_walk(&config).map(|r| r.entropies)
    };
    let (weak, strong) = match (run(0.1), run(0.8)) {
        (Ok(w), Ok(s)) => (w, s),
        (Err(e), _) | (_, Err(e)) => return failure(name, format!("walk failed: {e}")),
    };
    let mut worst = 0.0f64;
    for (w, s) in weak.iter().zip(strong.iter()) {
        worst = worst.max(w - s);
    }
    let grade = if worst < 1e-9 {
        'A'
    } else if worst < 1e-3 {
        'B'
    } else if worst < 0.05 {
        'C'
    } else {
        'F'
    };
    CheckResult {
        name: name.to_string(),
        passed: worst < 1e-6,
        p_value: None,
        statistic: worst,
        details: format!("max entropy drop under stronger damping = {worst:.2e}"),
        grade,
    }
}

/// Check 5: Depolarizing uniformity -- heavy depolarizing noise drives the
/// cycle-walk distribution to uniform. Chi-squared goodness of fit.
pub fn depolarizing_uniformity() -> CheckResult {
    let name = "Depolarizing Uniformity";
    let mut config = NoisyWalkConfig::new(4, 12);
    config.noise = vec![NoiseSpec {
        kind: NoiseChannelKind::Depolarizing,
        strength: 0.3,
        target: NoiseTarget::All,
    }];
    let result = match noisy_coined_walk(&config) {
        Ok(r) => r,
        Err(e) => return failure(name, format!("walk failed: {e}")),
    };
    let dist = result.distributions.last().cloned().unwrap_or_default();
    let k = dist.len() as f64;
    // Treat the distribution as 1000 synthetic draws.
    let n_eff = 1000.0;
    let expected = 1.0 / k;
    let chi2: f64 = dist
        .iter()
        .map(|&p| n_eff * (p - expected) * (p - expected) / expected)
        .sum();
    let p = match ChiSquared::new(k - 1.0) {
        Ok(d) => d.sf(chi2),
        Err(_) => return failure(name, "degenerate distribution".to_string()),
    };
    CheckResult {
        name: name.to_string(),
        passed: CheckResult::pass_from_p(Some(p), 0.01),
        p_value: Some(p),
        statistic: chi2,
        details: format!("chi2={chi2:.4} over {} nodes", dist.len()),
        grade: CheckResult::grade_from_p(Some(p)),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. ENCODER INVARIANTS
// ═══════════════════════════════════════════════════════════════════════════════

fn battery_encoder() -> Result<HypercubeEncoder, latticewalk_core::EngineError> {
    // Two saturated 2-bit features: every decodable vertex round-trips.
    let a = FeatureBin::new("a", vec![1.0, 2.0, 3.0], Some(0.0), Some(4.0))?;
    let b = FeatureBin::new("b", vec![1.0, 2.0, 3.0], Some(0.0), Some(4.0))?;
    HypercubeEncoder::new(vec![a, b])
}

/// Check 6: Encoder round trip -- decode then encode recovers every vertex.
pub fn encoder_round_trip() -> CheckResult {
    let name = "Encoder Round Trip";
    let enc = match battery_encoder() {
        Ok(e) => e,
        Err(e) => return failure(name, format!("encoder construction failed: {e}")),
    };
    let mut mismatches = 0u64;
    for v in 0..enc.vertex_count() {
        let ok = enc
            .decode(v)
            .and_then(|values| enc.encode(&values))
            .map(|back| back == v)
            .unwrap_or(false);
        if !ok {
            mismatches += 1;
        }
    }
    let grade = if mismatches == 0 { 'A' } else { 'F' };
    CheckResult {
        name: name.to_string(),
        passed: mismatches == 0,
        p_value: None,
        statistic: mismatches as f64,
        details: format!("{mismatches}/{} vertices failed", enc.vertex_count()),
        grade,
    }
}

/// Check 7: Hamming adjacency -- a one-bin move in a single feature moves the
/// encoded vertex by exactly one bit.
pub fn hamming_adjacency() -> CheckResult {
    let name = "Hamming Adjacency";
    let enc = match battery_encoder() {
        Ok(e) => e,
        Err(e) => return failure(name, format!("encoder construction failed: {e}")),
    };
    let record = |a: f64, b: f64| -> BTreeMap<String, f64> {
        [("a".to_string(), a), ("b".to_string(), b)].into()
    };
    let midpoints = [0.5, 1.5, 2.5, 3.5];
    let mut violations = 0u64;
    let mut pairs = 0u64;
    for w in midpoints.windows(2) {
        for &fixed in &midpoints {
            // Move feature "a", then feature "b".
            for (u, v) in [
                (record(w[0], fixed), record(w[1], fixed)),
                (record(fixed, w[0]), record(fixed, w[1])),
            ] {
                pairs += 1;
                let dist = match (enc.encode(&u), enc.encode(&v)) {
                    (Ok(x), Ok(y)) => (x ^ y).count_ones(),
                    _ => u32::MAX,
                };
                if dist != 1 {
                    violations += 1;
                }
            }
        }
    }
    let grade = if violations == 0 { 'A' } else { 'F' };
    CheckResult {
        name: name.to_string(),
        passed: violations == 0,
        p_value: None,
        statistic: violations as f64,
        details: format!("{violations}/{pairs} adjacent pairs violate Hamming-1"),
        grade,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 3. PIPELINE INVARIANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Check 8: Row stochasticity -- the series → symbols → graph → normalize
/// pipeline yields rows summing to 1 (sinks at 0) over a covering alphabet.
pub fn row_stochasticity() -> CheckResult {
    let name = "Row Stochasticity";
    let series = noisy_sine(400, 11);
    let symbols = match symbolic_approximation(&series, 4) {
        Ok(s) => s,
        Err(e) => return failure(name, format!("symbolization failed: {e}")),
    };
    let graph = match build_transition_graph(&symbols, true) {
        Ok(g) => g,
        Err(e) => return failure(name, format!("graph build failed: {e}")),
    };
    let normalized = normalize_graph(&graph);
    let report = validate_graph(&normalized, &symbols);

    let mut max_dev = 0.0f64;
    for i in 0..normalized.node_count() {
        let sum: f64 = normalized.successors(i).map(|(_, w)| w).sum();
        if sum > 0.0 {
            max_dev = max_dev.max((sum - 1.0).abs());
        }
    }
    let passed = max_dev < 1e-9 && report.covers_symbols && report.connected;
    let grade = if passed && max_dev < 1e-12 {
        'A'
    } else if passed {
        'B'
    } else {
        'F'
    };
    CheckResult {
        name: name.to_string(),
        passed,
        p_value: None,
        statistic: max_dev,
        details: format!(
            "nodes={}, edges={}, connected={}, max_dev={max_dev:.2e}",
            report.n_nodes, report.n_edges, report.connected
        ),
        grade,
    }
}

/// Check 9: Partition selection -- the entropy-maximizing partition matches a
/// brute-force sweep over candidate cluster counts.
pub fn partition_selection() -> CheckResult {
    let name = "Partition Selection";
    let states = bimodal_states(40, 29);
    let seed = 29;
    let max_bins = 5;
    let chosen = match entropy_partition(&states, max_bins, seed) {
        Ok(p) => p,
        Err(e) => return failure(name, format!("partition failed: {e}")),
    };
    let mut best = f64::NEG_INFINITY;
    for k in 2..=max_bins {
        let labels = match kmeans_partition(&states, k, seed) {
            Ok(r) => r.labels,
            Err(e) => return failure(name, format!("k-means failed at k={k}: {e}")),
        };
        let mut counts = vec![0.0f64; k];
        for &l in &labels {
            if l < k {
                counts[l] += 1.0;
            }
        }
        let total: f64 = counts.iter().sum();
        let probs: Vec<f64> = counts.iter().map(|c| c / total.max(1.0)).collect();
        best = best.max(shannon_entropy(&probs));
    }
    let gap = best - chosen.entropy;
    let grade = if gap.abs() < 1e-9 {
        'A'
    } else if gap < 0.01 {
        'B'
    } else if gap < 0.1 {
        'C'
    } else {
        'F'
    };
    CheckResult {
        name: name.to_string(),
        passed: gap < 1e-6,
        p_value: None,
        statistic: chosen.entropy,
        details: format!(
            "chosen k={} at {:.4} bits, brute-force best {best:.4}",
            chosen.n_clusters, chosen.entropy
        ),
        grade,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Run the complete invariant battery.
pub fn run_all_checks() -> Vec<CheckResult> {
    let checks: Vec<fn() -> CheckResult> = vec![
        // Walk invariants (5)
        probability_conservation,
        diffusion_scaling,
        ballistic_concentration,
        decoherence_entropy,
        depolarizing_uniformity,
        // Encoder invariants (2)
        encoder_round_trip,
        hamming_adjacency,
        // Pipeline invariants (2)
        row_stochasticity,
        partition_selection,
    ];
    checks.iter().map(|check| check()).collect()
}

/// Overall quality score (0-100) from check results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
pub fn calculate_quality_score(results: &[CheckResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}
