//! Decohering coined quantum walk on cycle and path graphs.
//!
//! State is a density matrix over a composite register of
//! `ceil(log2(num_nodes))` position qubits plus one coin qubit (basis index
//! `coin · 2^p + position`). Each step conjugates by the fixed unitary
//! `shift · (coin ⊗ I)`, then applies the configured single-qubit noise
//! channels in order. Occupation probabilities marginalize the diagonal over
//! the coin qubit; mass sitting on position states past `num_nodes − 1`
//! (unused high-order qubit patterns) is excluded and the remainder
//! renormalized.
//!
//! The shift operator is a permutation. On a cycle the two coin branches move
//! the position −1/+1 modulo `num_nodes`. On a path the boundary vertices
//! reflect into the *other* coin branch instead of wrapping — the permutation
//! stays a bijection and the walker bounces off the ends.

use num_complex::Complex64;
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::stats::{hitting_time, shannon_entropy};

/// Hard capacity contract: density matrices are `O(4^qubits)`, so the
/// composite register is capped at this many position qubits.
pub const MAX_POSITION_QUBITS: u32 = 10;

// ---------------------------------------------------------------------------
// Noise profile
// ---------------------------------------------------------------------------

/// Single-qubit decoherence channel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseChannelKind {
    PhaseDamping,
    PhaseFlip,
    BitFlip,
    AmplitudeDamping,
    Depolarizing,
}

impl std::fmt::Display for NoiseChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PhaseDamping => write!(f, "phase"),
            Self::PhaseFlip => write!(f, "phase_flip"),
            Self::BitFlip => write!(f, "bit_flip"),
            Self::AmplitudeDamping => write!(f, "amplitude"),
            Self::Depolarizing => write!(f, "depolarizing"),
        }
    }
}

/// Which qubits a channel acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseTarget {
    /// The coin qubit only.
    Coin,
    /// Every position qubit.
    Positions,
    /// Every qubit in the register.
    All,
    /// One explicit qubit index (position qubits first, coin last).
    Qubit(u32),
}

impl std::fmt::Display for NoiseTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coin => write!(f, "coin"),
            Self::Positions => write!(f, "positions"),
            Self::All => write!(f, "all"),
            Self::Qubit(q) => write!(f, "q{q}"),
        }
    }
}

/// One noise channel application per walk step.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NoiseSpec {
    pub kind: NoiseChannelKind,
    /// Channel strength in `[0, 1]`. Negative strengths are rejected;
    /// strengths above 1 are clipped to 1.
    pub strength: f64,
    pub target: NoiseTarget,
}

// ---------------------------------------------------------------------------
// Configuration and result
// ---------------------------------------------------------------------------

/// Graph topology for the shift operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkTopology {
    /// Positions shift ±1 modulo `num_nodes`.
    Cycle,
    /// Boundary vertices reflect into the other coin branch.
    Path,
}

/// Configuration for a noisy coined walk.
#[derive(Debug, Clone)]
pub struct NoisyWalkConfig {
    pub num_nodes: usize,
    pub steps: usize,
    pub topology: WalkTopology,
    /// Initial occupation probability per node; normalized internally.
    pub initial_distribution: Vec<f64>,
    /// Initial coin amplitudes; normalized internally, must not be zero.
    pub coin_state: [Complex64; 2],
    /// 2×2 coin matrix; `None` selects the Hadamard coin.
    pub coin: Option<Vec<Vec<Complex64>>>,
    /// Noise channels applied, in order, after each unitary step.
    pub noise: Vec<NoiseSpec>,
    /// Node whose first-passage step is reported, with the mass threshold.
    pub hitting_target: Option<usize>,
    pub hitting_threshold: f64,
}

impl NoisyWalkConfig {
    /// Noiseless cycle walk from a point mass at node 0 with coin `|0⟩`.
    pub fn new(num_nodes: usize, steps: usize) -> Self {
        let mut initial_distribution = vec![0.0; num_nodes];
        if let Some(first) = initial_distribution.first_mut() {
            *first = 1.0;
        }
        Self {
            num_nodes,
            steps,
            topology: WalkTopology::Cycle,
            initial_distribution,
            coin_state: [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            coin: None,
            noise: Vec::new(),
            hitting_target: None,
            hitting_threshold: 0.5,
        }
    }
}

/// Immutable record of one noisy walk simulation.
#[derive(Debug, Clone, Serialize)]
pub struct NoisyQuantumWalkResult {
    /// Node indices, `0..num_nodes`.
    pub positions: Vec<usize>,
    /// Occupation distribution per step, shape `(steps + 1, num_nodes)`.
    pub distributions: Vec<Vec<f64>>,
    /// Shannon entropy (bits) of each step's distribution.
    pub entropies: Vec<f64>,
    /// Coin label (`"hadamard"` or `"custom"`).
    pub coin: String,
    /// The applied noise profile, strengths as clipped.
    pub noise_profile: Vec<NoiseSpec>,
    /// First step at which the target node's mass reached the threshold.
    pub hitting_time: Option<usize>,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Run a decohering coined walk and collect its distribution time series.
pub fn noisy_coined_walk(config: &NoisyWalkConfig) -> Result<NoisyQuantumWalkResult> {
    let n_nodes = config.num_nodes;
    if n_nodes < 2 {
        return Err(EngineError::InvalidInput(
            "noisy walk needs at least 2 nodes".into(),
        ));
    }
    let n_pos = (usize::BITS - (n_nodes - 1).leading_zeros()).max(1);
    if n_pos > MAX_POSITION_QUBITS {
        return Err(EngineError::Unsupported(format!(
            "{n_nodes} nodes need {n_pos} position qubits, above the cap of {MAX_POSITION_QUBITS}"
        )));
    }
    let n_qubits = n_pos + 1; // coin qubit is the last index
    let pos_states = 1usize << n_pos;
    let dim = pos_states << 1;

    // --- validate inputs -------------------------------------------------
    if config.initial_distribution.len() != n_nodes {
        return Err(EngineError::InvalidInput(format!(
            "initial distribution has {} entries for {} nodes",
            config.initial_distribution.len(),
            n_nodes
        )));
    }
    if config.initial_distribution.iter().any(|&p| p < 0.0) {
        return Err(EngineError::InvalidInput(
            "initial distribution has negative entries".into(),
        ));
    }
    let mass: f64 = config.initial_distribution.iter().sum();
    if mass <= 0.0 {
        return Err(EngineError::InvalidInput(
            "initial distribution has zero total mass".into(),
        ));
    }

    let coin_norm_sq: f64 = config.coin_state.iter().map(|a| a.norm_sqr()).sum();
    if coin_norm_sq <= 0.0 {
        return Err(EngineError::InvalidInput(
            "coin state must not be the zero vector".into(),
        ));
    }

    let (coin_matrix, coin_label) = match &config.coin {
        None => (hadamard_2x2(), "hadamard"),
        Some(m) => {
            if m.len() != 2 || m.iter().any(|row| row.len() != 2) {
                let rows = m.len();
                let cols = m.first().map_or(0, |r| r.len());
                return Err(EngineError::ShapeMismatch {
                    expected: (2, 2),
                    actual: (rows, cols),
                });
            }
            (
                [[m[0][0], m[0][1]], [m[1][0], m[1][1]]],
                "custom",
            )
        }
    };

    let mut profile = Vec::with_capacity(config.noise.len());
    for spec in &config.noise {
        if spec.strength < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "noise strength {} is negative",
                spec.strength
            )));
        }
        if let NoiseTarget::Qubit(q) = spec.target {
            if q >= n_qubits {
                return Err(EngineError::InvalidInput(format!(
                    "noise target q{q} outside the {n_qubits}-qubit register"
                )));
            }
        }
        let mut clipped = *spec;
        if clipped.strength > 1.0 {
            log::warn!(
                "clipping {} channel strength {} to 1.0",
                clipped.kind,
                clipped.strength
            );
            clipped.strength = 1.0;
        }
        profile.push(clipped);
    }

    // --- initial density matrix ------------------------------------------
    let coin_scale = 1.0 / coin_norm_sq.sqrt();
    let mut psi = vec![Complex64::new(0.0, 0.0); dim];
    for (x, &p) in config.initial_distribution.iter().enumerate() {
        let amp = (p / mass).sqrt();
        psi[x] = config.coin_state[0] * coin_scale * amp;
        psi[pos_states + x] = config.coin_state[1] * coin_scale * amp;
    }
    let mut rho: Vec<Vec<Complex64>> = (0..dim)
        .map(|i| (0..dim).map(|j| psi[i] * psi[j].conj()).collect())
        .collect();

    let perm = shift_permutation(n_nodes, pos_states, config.topology);

    // --- evolve -----------------------------------------------------------
    let mut distributions = Vec::with_capacity(config.steps + 1);
    distributions.push(measure(&rho, pos_states, n_nodes)?);
    for _ in 0..config.steps {
        apply_coin(&mut rho, &coin_matrix, pos_states);
        apply_permutation(&mut rho, &perm);
        for spec in &profile {
            let kraus = kraus_set(spec.kind, spec.strength);
            for q in target_qubits(spec.target, n_pos) {
                apply_single_qubit_channel(&mut rho, &kraus, q);
            }
        }
        distributions.push(measure(&rho, pos_states, n_nodes)?);
    }

    let entropies = distributions.iter().map(|d| shannon_entropy(d)).collect();
    let hit = config
        .hitting_target
        .map(|target| {
            if target >= n_nodes {
                return Err(EngineError::InvalidInput(format!(
                    "hitting target {target} outside the {n_nodes}-node graph"
                )));
            }
            Ok(hitting_time(&distributions, target, config.hitting_threshold))
        })
        .transpose()?
        .flatten();

    Ok(NoisyQuantumWalkResult {
        positions: (0..n_nodes).collect(),
        distributions,
        entropies,
        coin: coin_label.to_string(),
        noise_profile: profile,
        hitting_time: hit,
    })
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

fn hadamard_2x2() -> [[Complex64; 2]; 2] {
    let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

/// Basis permutation of the shift operator. Invalid high-order position
/// patterns (at or past `num_nodes`) map to themselves.
fn shift_permutation(num_nodes: usize, pos_states: usize, topology: WalkTopology) -> Vec<usize> {
    let dim = pos_states << 1;
    let mut perm = vec![0usize; dim];
    for coin in 0..2usize {
        for x in 0..pos_states {
            let src = coin * pos_states + x;
            perm[src] = if x >= num_nodes {
                src
            } else {
                match topology {
                    WalkTopology::Cycle => {
                        let nx = if coin == 0 {
                            (x + num_nodes - 1) % num_nodes
                        } else {
                            (x + 1) % num_nodes
                        };
                        coin * pos_states + nx
                    }
                    WalkTopology::Path => {
                        if coin == 0 && x == 0 {
                            pos_states // reflect: coin flips, position stays
                        } else if coin == 1 && x == num_nodes - 1 {
                            x
                        } else if coin == 0 {
                            x - 1
                        } else {
                            pos_states + x + 1
                        }
                    }
                }
            };
        }
    }
    perm
}

/// Conjugate by `C ⊗ I`: the coin qubit is the high bit of the basis index.
fn apply_coin(rho: &mut Vec<Vec<Complex64>>, coin: &[[Complex64; 2]; 2], pos_states: usize) {
    let dim = rho.len();
    // Left multiply: rows mix in coin pairs.
    for x in 0..pos_states {
        for j in 0..dim {
            let a = rho[x][j];
            let b = rho[pos_states + x][j];
            rho[x][j] = coin[0][0] * a + coin[0][1] * b;
            rho[pos_states + x][j] = coin[1][0] * a + coin[1][1] * b;
        }
    }
    // Right multiply by the adjoint: columns mix in coin pairs.
    for i in 0..dim {
        for x in 0..pos_states {
            let a = rho[i][x];
            let b = rho[i][pos_states + x];
            rho[i][x] = a * coin[0][0].conj() + b * coin[0][1].conj();
            rho[i][pos_states + x] = a * coin[1][0].conj() + b * coin[1][1].conj();
        }
    }
}

/// Conjugate by the shift permutation: `ρ[P(i)][P(j)] = ρ_old[i][j]`.
fn apply_permutation(rho: &mut Vec<Vec<Complex64>>, perm: &[usize]) {
    let dim = rho.len();
    let mut out = vec![vec![Complex64::new(0.0, 0.0); dim]; dim];
    for i in 0..dim {
        for j in 0..dim {
            out[perm[i]][perm[j]] = rho[i][j];
        }
    }
    *rho = out;
}

/// Kraus operators for one channel at the given (already clipped) strength.
fn kraus_set(kind: NoiseChannelKind, s: f64) -> Vec<[[Complex64; 2]; 2]> {
    let re = |v: f64| Complex64::new(v, 0.0);
    let zero = Complex64::new(0.0, 0.0);
    match kind {
        NoiseChannelKind::PhaseDamping => vec![
            [[re(1.0), zero], [zero, re((1.0 - s).sqrt())]],
            [[zero, zero], [zero, re(s.sqrt())]],
        ],
        NoiseChannelKind::PhaseFlip => vec![
            [[re((1.0 - s).sqrt()), zero], [zero, re((1.0 - s).sqrt())]],
            [[re(s.sqrt()), zero], [zero, re(-s.sqrt())]],
        ],
        NoiseChannelKind::BitFlip => vec![
            [[re((1.0 - s).sqrt()), zero], [zero, re((1.0 - s).sqrt())]],
            [[zero, re(s.sqrt())], [re(s.sqrt()), zero]],
        ],
        NoiseChannelKind::AmplitudeDamping => vec![
            [[re(1.0), zero], [zero, re((1.0 - s).sqrt())]],
            [[zero, re(s.sqrt())], [zero, zero]],
        ],
        NoiseChannelKind::Depolarizing => {
            let p = s / 3.0;
            vec![
                [[re((1.0 - s).sqrt()), zero], [zero, re((1.0 - s).sqrt())]],
                [[zero, re(p.sqrt())], [re(p.sqrt()), zero]],
                [
                    [zero, Complex64::new(0.0, -p.sqrt())],
                    [Complex64::new(0.0, p.sqrt()), zero],
                ],
                [[re(p.sqrt()), zero], [zero, re(-p.sqrt())]],
            ]
        }
    }
}

fn target_qubits(target: NoiseTarget, n_pos: u32) -> Vec<u32> {
    match target {
        NoiseTarget::Coin => vec![n_pos],
        NoiseTarget::Positions => (0..n_pos).collect(),
        NoiseTarget::All => (0..=n_pos).collect(),
        NoiseTarget::Qubit(q) => vec![q],
    }
}

/// Apply `ρ → Σ_K K ρ K†` for a single-qubit Kraus set on qubit `q`
/// (position qubits are the low bits, the coin qubit the highest).
fn apply_single_qubit_channel(
    rho: &mut Vec<Vec<Complex64>>,
    kraus: &[[[Complex64; 2]; 2]],
    q: u32,
) {
    let dim = rho.len();
    let bit = 1usize << q;
    let mut out = vec![vec![Complex64::new(0.0, 0.0); dim]; dim];
    let mut tmp = vec![vec![Complex64::new(0.0, 0.0); dim]; dim];
    for k in kraus {
        // tmp = K ρ
        for row in tmp.iter_mut() {
            for cell in row.iter_mut() {
                *cell = Complex64::new(0.0, 0.0);
            }
        }
        for i in 0..dim {
            let bi = (i >> q) & 1;
            for a in 0..2usize {
                let coef = k[bi][a];
                if coef == Complex64::new(0.0, 0.0) {
                    continue;
                }
                let src = (i & !bit) | (a << q);
                for j in 0..dim {
                    tmp[i][j] += coef * rho[src][j];
                }
            }
        }
        // out += tmp K†
        for i in 0..dim {
            for j in 0..dim {
                let bj = (j >> q) & 1;
                for b in 0..2usize {
                    let coef = k[bj][b].conj();
                    if coef == Complex64::new(0.0, 0.0) {
                        continue;
                    }
                    let src = (j & !bit) | (b << q);
                    out[i][j] += tmp[i][src] * coef;
                }
            }
        }
    }
    *rho = out;
}

/// Diagonal-block marginal over the coin qubit, restricted to valid node
/// indices and renormalized.
fn measure(rho: &[Vec<Complex64>], pos_states: usize, num_nodes: usize) -> Result<Vec<f64>> {
    let mut dist: Vec<f64> = (0..num_nodes)
        .map(|x| (rho[x][x] + rho[pos_states + x][pos_states + x]).re.max(0.0))
        .collect();
    let total: f64 = dist.iter().sum();
    if total <= 1e-12 {
        return Err(EngineError::InvalidInput(
            "all probability mass leaked outside valid node indices".into(),
        ));
    }
    for p in dist.iter_mut() {
        *p /= total;
    }
    Ok(dist)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(kind: NoiseChannelKind, strength: f64, target: NoiseTarget) -> NoiseSpec {
        NoiseSpec {
            kind,
            strength,
            target,
        }
    }

    #[test]
    fn test_noiseless_cycle_conserves_probability() {
        let config = NoisyWalkConfig::new(4, 6);
        let result = noisy_coined_walk(&config).unwrap();
        assert_eq!(result.distributions.len(), 7);
        for (t, dist) in result.distributions.iter().enumerate() {
            let sum: f64 = dist.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "step {t} sums to {sum}");
        }
    }

    #[test]
    fn test_cycle_first_step_wraps() {
        // From node 0 with coin |0>, the Hadamard splits mass between the
        // left neighbor (wrapping to node 3) and the right neighbor.
        let config = NoisyWalkConfig::new(4, 1);
        let result = noisy_coined_walk(&config).unwrap();
        let step1 = &result.distributions[1];
        assert!((step1[3] - 0.5).abs() < 1e-9, "left wrap: {step1:?}");
        assert!((step1[1] - 0.5).abs() < 1e-9, "right move: {step1:?}");
        assert!(step1[0].abs() < 1e-12);
    }

    #[test]
    fn test_path_left_boundary_reflects() {
        // At the left end, the leftward coin branch reflects instead of
        // wrapping: mass stays at node 0.
        let mut config = NoisyWalkConfig::new(3, 1);
        config.topology = WalkTopology::Path;
        let result = noisy_coined_walk(&config).unwrap();
        let step1 = &result.distributions[1];
        assert!((step1[0] - 0.5).abs() < 1e-9, "reflected: {step1:?}");
        assert!((step1[1] - 0.5).abs() < 1e-9);
        assert!(step1[2].abs() < 1e-12);
    }

    #[test]
    fn test_path_right_boundary_reflects() {
        // Start at the right end moving right: the rightward branch reflects.
        let mut config = NoisyWalkConfig::new(3, 1);
        config.topology = WalkTopology::Path;
        config.initial_distribution = vec![0.0, 0.0, 1.0];
        config.coin_state = [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];
        let result = noisy_coined_walk(&config).unwrap();
        let step1 = &result.distributions[1];
        assert!((step1[2] - 0.5).abs() < 1e-9, "reflected: {step1:?}");
        assert!((step1[1] - 0.5).abs() < 1e-9);
        assert!(step1[0].abs() < 1e-12);
    }

    #[test]
    fn test_phase_damping_entropy_monotone_in_strength() {
        let run = |strength: f64| {
            let mut config = NoisyWalkConfig::new(4, 6);
            config.noise = vec![spec(
                NoiseChannelKind::PhaseDamping,
                strength,
                NoiseTarget::All,
            )];
            noisy_coined_walk(&config).unwrap().entropies
        };
        let e0 = run(0.0);
        let e1 = run(0.3);
        let e2 = run(0.9);
        for t in 0..e0.len() {
            assert!(e1[t] >= e0[t] - 1e-9, "step {t}: {} < {}", e1[t], e0[t]);
            assert!(e2[t] >= e1[t] - 1e-9, "step {t}: {} < {}", e2[t], e1[t]);
        }
    }

    #[test]
    fn test_non_power_of_two_nodes_stay_normalized() {
        let mut config = NoisyWalkConfig::new(5, 4);
        config.noise = vec![spec(
            NoiseChannelKind::Depolarizing,
            0.3,
            NoiseTarget::All,
        )];
        let result = noisy_coined_walk(&config).unwrap();
        for dist in &result.distributions {
            assert_eq!(dist.len(), 5);
            let sum: f64 = dist.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
        // Depolarizing pushes toward uniform: entropy approaches log2(5).
        let last = *result.entropies.last().unwrap();
        assert!(last > 2.0, "entropy {last} too low");
    }

    #[test]
    fn test_every_channel_preserves_trace() {
        for kind in [
            NoiseChannelKind::PhaseDamping,
            NoiseChannelKind::PhaseFlip,
            NoiseChannelKind::BitFlip,
            NoiseChannelKind::AmplitudeDamping,
            NoiseChannelKind::Depolarizing,
        ] {
            let mut config = NoisyWalkConfig::new(4, 5);
            config.noise = vec![spec(kind, 0.4, NoiseTarget::All)];
            let result = noisy_coined_walk(&config).unwrap();
            for (t, dist) in result.distributions.iter().enumerate() {
                let sum: f64 = dist.iter().sum();
                assert!((sum - 1.0).abs() < 1e-9, "{kind} step {t} sums to {sum}");
            }
        }
    }

    #[test]
    fn test_hitting_time_reported() {
        let mut config = NoisyWalkConfig::new(4, 8);
        config.hitting_target = Some(2);
        config.hitting_threshold = 0.2;
        let result = noisy_coined_walk(&config).unwrap();
        if let Some(t) = result.hitting_time {
            assert!(result.distributions[t][2] >= 0.2);
        }
        // Threshold 0 trips immediately at step 0.
        config.hitting_threshold = 0.0;
        let result = noisy_coined_walk(&config).unwrap();
        assert_eq!(result.hitting_time, Some(0));
    }

    #[test]
    fn test_strength_clipped_not_rejected() {
        let mut config = NoisyWalkConfig::new(4, 2);
        config.noise = vec![spec(NoiseChannelKind::PhaseFlip, 1.7, NoiseTarget::Coin)];
        let result = noisy_coined_walk(&config).unwrap();
        assert_eq!(result.noise_profile[0].strength, 1.0);
    }

    #[test]
    fn test_invalid_configs_fail_fast() {
        // Negative strength.
        let mut config = NoisyWalkConfig::new(4, 2);
        config.noise = vec![spec(NoiseChannelKind::BitFlip, -0.1, NoiseTarget::Coin)];
        assert!(noisy_coined_walk(&config).is_err());

        // Zero coin state.
        let mut config = NoisyWalkConfig::new(4, 2);
        config.coin_state = [Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)];
        assert!(noisy_coined_walk(&config).is_err());

        // Negative initial mass.
        let mut config = NoisyWalkConfig::new(4, 2);
        config.initial_distribution = vec![1.0, -0.5, 0.0, 0.5];
        assert!(noisy_coined_walk(&config).is_err());

        // Zero total mass.
        let mut config = NoisyWalkConfig::new(4, 2);
        config.initial_distribution = vec![0.0; 4];
        assert!(noisy_coined_walk(&config).is_err());

        // Wrong coin shape.
        let mut config = NoisyWalkConfig::new(4, 2);
        config.coin = Some(vec![vec![Complex64::new(1.0, 0.0); 3]; 3]);
        assert!(matches!(
            noisy_coined_walk(&config),
            Err(EngineError::ShapeMismatch { .. })
        ));

        // Out-of-register qubit target.
        let mut config = NoisyWalkConfig::new(4, 2);
        config.noise = vec![spec(NoiseChannelKind::BitFlip, 0.1, NoiseTarget::Qubit(9))];
        assert!(noisy_coined_walk(&config).is_err());
    }

    #[test]
    fn test_capacity_contract() {
        // 3000 nodes need 12 position qubits, past the cap.
        let config = NoisyWalkConfig::new(3000, 1);
        assert!(matches!(
            noisy_coined_walk(&config),
            Err(EngineError::Unsupported(_))
        ));
    }

    #[test]
    fn test_noise_target_display() {
        assert_eq!(NoiseTarget::Coin.to_string(), "coin");
        assert_eq!(NoiseTarget::Qubit(3).to_string(), "q3");
        assert_eq!(NoiseChannelKind::PhaseDamping.to_string(), "phase");
    }
}
