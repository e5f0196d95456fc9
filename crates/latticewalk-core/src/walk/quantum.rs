//! Coined quantum walks on the Boolean hypercube.
//!
//! The coin register has one direction per bit, so the coin dimension equals
//! the hypercube dimension (not 2). Each step applies the coin matrix to the
//! direction amplitudes, then shifts: amplitude in channel `k` at vertex `v`
//! moves to `v XOR (1 << k)`. Total probability is renormalized every step to
//! absorb floating-point drift; under a unitary coin the renormalization is a
//! no-op up to epsilon, and exact probability conservation is the primary
//! invariant the tests pin down.

use num_complex::Complex64;

use crate::error::{EngineError, Result};
use crate::walk::{check_hypercube_dimensions, check_start_vertex};

/// Coin operator for the hypercube walk.
#[derive(Debug, Clone)]
pub enum HypercubeCoin {
    /// Normalized Walsh–Hadamard matrix of order `dimensions`. Only exists
    /// for power-of-two orders; other orders fail fast.
    Hadamard,
    /// Grover diffusion coin `(2/d)·J − I`, defined for any order.
    Grover,
    /// Caller-supplied matrix, shape-validated against `d × d`.
    Custom(Vec<Vec<Complex64>>),
}

/// Per-step coin strategy for the adaptive walk.
///
/// Contract: given the step index and the current occupation distribution,
/// return a `d × d` coin matrix. The shape is validated before every use.
pub type CoinCallback<'a> = dyn Fn(usize, &[f64]) -> Vec<Vec<Complex64>> + 'a;

// ---------------------------------------------------------------------------
// Coin construction
// ---------------------------------------------------------------------------

fn walsh_hadamard(d: usize) -> Result<Vec<Vec<Complex64>>> {
    if !d.is_power_of_two() {
        return Err(EngineError::InvalidInput(format!(
            "Walsh-Hadamard coin needs a power-of-two order, got {d}"
        )));
    }
    let scale = 1.0 / (d as f64).sqrt();
    let mut m = vec![vec![Complex64::new(0.0, 0.0); d]; d];
    for (r, row) in m.iter_mut().enumerate() {
        for (c, entry) in row.iter_mut().enumerate() {
            // Entry sign is the parity of the AND of row and column indices.
            let sign = if (r & c).count_ones() % 2 == 0 {
                1.0
            } else {
                -1.0
            };
            *entry = Complex64::new(sign * scale, 0.0);
        }
    }
    Ok(m)
}

fn grover_coin(d: usize) -> Vec<Vec<Complex64>> {
    let off = 2.0 / d as f64;
    let mut m = vec![vec![Complex64::new(off, 0.0); d]; d];
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = Complex64::new(off - 1.0, 0.0);
    }
    m
}

fn validate_coin_shape(matrix: &[Vec<Complex64>], d: usize) -> Result<()> {
    if matrix.len() != d || matrix.iter().any(|row| row.len() != d) {
        let rows = matrix.len();
        let cols = matrix.first().map_or(0, |r| r.len());
        return Err(EngineError::ShapeMismatch {
            expected: (d, d),
            actual: (rows, cols),
        });
    }
    Ok(())
}

fn resolve_coin(coin: &HypercubeCoin, d: usize) -> Result<Vec<Vec<Complex64>>> {
    match coin {
        HypercubeCoin::Hadamard => walsh_hadamard(d),
        HypercubeCoin::Grover => Ok(grover_coin(d)),
        HypercubeCoin::Custom(m) => {
            validate_coin_shape(m, d)?;
            Ok(m.clone())
        }
    }
}

// ---------------------------------------------------------------------------
// Walk engines
// ---------------------------------------------------------------------------

/// Coined walk with a fixed coin, started in the equal coin superposition at
/// `start`. Returns `steps + 1` occupation distributions over `2^dimensions`
/// vertices.
pub fn quantum_hypercube_time_series(
    dimensions: u32,
    steps: usize,
    start: u64,
    coin: &HypercubeCoin,
) -> Result<Vec<Vec<f64>>> {
    let matrix = resolve_coin(coin, dimensions as usize)?;
    run_coined_walk(dimensions, steps, start, |_, _| Ok(matrix.clone()))
}

/// Coined walk whose coin matrix is recomputed every step by `coin_callback`.
/// The returned matrix's shape is validated against `d × d` before each use.
pub fn adaptive_quantum_hypercube_time_series(
    dimensions: u32,
    steps: usize,
    start: u64,
    coin_callback: &CoinCallback<'_>,
) -> Result<Vec<Vec<f64>>> {
    let d = dimensions as usize;
    run_coined_walk(dimensions, steps, start, |step, dist| {
        let matrix = coin_callback(step, dist);
        validate_coin_shape(&matrix, d)?;
        Ok(matrix)
    })
}

fn run_coined_walk(
    dimensions: u32,
    steps: usize,
    start: u64,
    mut coin_for_step: impl FnMut(usize, &[f64]) -> Result<Vec<Vec<Complex64>>>,
) -> Result<Vec<Vec<f64>>> {
    let n = check_hypercube_dimensions(dimensions)? as usize;
    check_start_vertex(start, n as u64)?;
    let d = dimensions as usize;

    // amp[k][v]: amplitude in coin channel k at vertex v.
    let mut amp = vec![vec![Complex64::new(0.0, 0.0); n]; d];
    let init = Complex64::new(1.0 / (d as f64).sqrt(), 0.0);
    for channel in amp.iter_mut() {
        channel[start as usize] = init;
    }

    let mut series = Vec::with_capacity(steps + 1);
    series.push(occupation(&amp));

    for step in 0..steps {
        let coin = coin_for_step(step, series.last().map(|r| r.as_slice()).unwrap_or(&[]))?;

        // Coin: mix direction amplitudes at every vertex.
        let mut mixed = vec![vec![Complex64::new(0.0, 0.0); n]; d];
        for (j, row) in coin.iter().enumerate() {
            for (k, &c) in row.iter().enumerate() {
                if c == Complex64::new(0.0, 0.0) {
                    continue;
                }
                for v in 0..n {
                    mixed[j][v] += c * amp[k][v];
                }
            }
        }

        // Shift: channel k flips bit k.
        let mut shifted = vec![vec![Complex64::new(0.0, 0.0); n]; d];
        for k in 0..d {
            for v in 0..n {
                shifted[k][v ^ (1usize << k)] = mixed[k][v];
            }
        }
        amp = shifted;

        // Renormalize against floating-point drift (and non-unitary custom
        // coins); unitary coins leave this a no-op up to epsilon.
        let total: f64 = amp
            .iter()
            .flat_map(|ch| ch.iter())
            .map(|a| a.norm_sqr())
            .sum();
        if total <= 0.0 {
            return Err(EngineError::InvalidInput(
                "coin annihilated the walker state (zero total amplitude)".into(),
            ));
        }
        let scale = 1.0 / total.sqrt();
        for channel in amp.iter_mut() {
            for a in channel.iter_mut() {
                *a *= scale;
            }
        }

        series.push(occupation(&amp));
    }
    Ok(series)
}

/// Occupation probability per vertex: squared magnitudes summed over the coin
/// index.
fn occupation(amp: &[Vec<Complex64>]) -> Vec<f64> {
    let n = amp[0].len();
    let mut dist = vec![0.0; n];
    for channel in amp {
        for (v, a) in channel.iter().enumerate() {
            dist[v] += a.norm_sqr();
        }
    }
    dist
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_distribution_rows(series: &[Vec<f64>], n: usize) {
        for (t, row) in series.iter().enumerate() {
            assert_eq!(row.len(), n);
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "step {t} sums to {sum}");
            assert!(row.iter().all(|&p| p >= -1e-12), "step {t} negative mass");
        }
    }

    #[test]
    fn test_grover_walk_conserves_probability() {
        let series = quantum_hypercube_time_series(3, 12, 0, &HypercubeCoin::Grover).unwrap();
        assert_eq!(series.len(), 13);
        assert_distribution_rows(&series, 8);
    }

    #[test]
    fn test_hadamard_walk_conserves_probability() {
        let series = quantum_hypercube_time_series(4, 10, 3, &HypercubeCoin::Hadamard).unwrap();
        assert_distribution_rows(&series, 16);
    }

    #[test]
    fn test_hadamard_rejects_non_power_of_two_order() {
        let err = quantum_hypercube_time_series(3, 2, 0, &HypercubeCoin::Hadamard).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_custom_coin_shape_validated() {
        let wrong = vec![vec![Complex64::new(1.0, 0.0); 3]; 2];
        let err =
            quantum_hypercube_time_series(3, 2, 0, &HypercubeCoin::Custom(wrong)).unwrap_err();
        assert_eq!(
            err,
            EngineError::ShapeMismatch {
                expected: (3, 3),
                actual: (2, 3)
            }
        );
    }

    #[test]
    fn test_grover_d3_beats_classical_peak_at_step_5() {
        // Ballistic vs diffusive: the quantum walk concentrates more mass on
        // its most likely vertex than classical diffusion does.
        let quantum = quantum_hypercube_time_series(3, 5, 0, &HypercubeCoin::Grover).unwrap();
        let classical =
            crate::walk::classical_hypercube_time_series(3, 5, 0).unwrap();
        let q_max = quantum[5].iter().cloned().fold(0.0, f64::max);
        let c_max = classical[5].iter().cloned().fold(0.0, f64::max);
        assert!(
            q_max > c_max,
            "quantum peak {q_max} not above classical peak {c_max}"
        );
    }

    #[test]
    fn test_walk_lives_on_correct_parity() {
        // Every step flips exactly one bit, so vertex parity alternates.
        let series = quantum_hypercube_time_series(4, 3, 0, &HypercubeCoin::Hadamard).unwrap();
        for (t, row) in series.iter().enumerate() {
            for (v, &p) in row.iter().enumerate() {
                if (v.count_ones() as usize) % 2 != t % 2 {
                    assert!(p.abs() < 1e-12, "step {t} vertex {v} has mass {p}");
                }
            }
        }
    }

    #[test]
    fn test_adaptive_coin_called_each_step_and_validated() {
        use std::cell::Cell;
        let calls = Cell::new(0usize);
        let callback = |_step: usize, _dist: &[f64]| {
            calls.set(calls.get() + 1);
            // Identity coin: walker bounces deterministically.
            let mut m = vec![vec![Complex64::new(0.0, 0.0); 3]; 3];
            for (i, row) in m.iter_mut().enumerate() {
                row[i] = Complex64::new(1.0, 0.0);
            }
            m
        };
        let series = adaptive_quantum_hypercube_time_series(3, 4, 0, &callback).unwrap();
        assert_eq!(calls.get(), 4);
        assert_distribution_rows(&series, 8);

        let bad = |_: usize, _: &[f64]| vec![vec![Complex64::new(1.0, 0.0); 2]; 2];
        let err = adaptive_quantum_hypercube_time_series(3, 1, 0, &bad).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_identity_coin_period_two() {
        // Identity coin + XOR shift returns the walker to start every 2 steps
        // (each channel flips the same bit back and forth).
        let identity = {
            let mut m = vec![vec![Complex64::new(0.0, 0.0); 4]; 4];
            for (i, row) in m.iter_mut().enumerate() {
                row[i] = Complex64::new(1.0, 0.0);
            }
            m
        };
        let series =
            quantum_hypercube_time_series(4, 4, 6, &HypercubeCoin::Custom(identity)).unwrap();
        assert!((series[0][6] - 1.0).abs() < 1e-12);
        assert!((series[2][6] - 1.0).abs() < 1e-9);
        assert!((series[4][6] - 1.0).abs() < 1e-9);
    }
}
