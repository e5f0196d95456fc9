//! Non-commutativity penalty for sequences of SU(2) coin rotations.
//!
//! Callers fitting adaptive coins regularize with this: each parameter vector
//! `θ` is read as generator coefficients along the three Pauli directions, and
//! the penalty accumulates the squared Frobenius norm of every pairwise
//! commutator. Commuting generators (all along one axis) score exactly zero;
//! the score grows monotonically with pairwise non-commutativity.

use num_complex::Complex64;

type Mat2 = [[Complex64; 2]; 2];

/// Anti-Hermitian SU(2) generator `i·(θ·σ)` for a 3-vector of Pauli
/// coefficients.
fn generator(theta: &[f64; 3]) -> Mat2 {
    let i = Complex64::new(0.0, 1.0);
    let (x, y, z) = (theta[0], theta[1], theta[2]);
    // θ·σ = x·σx + y·σy + z·σz
    let m = [
        [Complex64::new(z, 0.0), Complex64::new(x, -y)],
        [Complex64::new(x, y), Complex64::new(-z, 0.0)],
    ];
    [
        [i * m[0][0], i * m[0][1]],
        [i * m[1][0], i * m[1][1]],
    ]
}

fn commutator(a: &Mat2, b: &Mat2) -> Mat2 {
    let mut out = [[Complex64::new(0.0, 0.0); 2]; 2];
    for r in 0..2 {
        for c in 0..2 {
            let mut ab = Complex64::new(0.0, 0.0);
            let mut ba = Complex64::new(0.0, 0.0);
            for k in 0..2 {
                ab += a[r][k] * b[k][c];
                ba += b[r][k] * a[k][c];
            }
            out[r][c] = ab - ba;
        }
    }
    out
}

fn frobenius_sq(m: &Mat2) -> f64 {
    m.iter()
        .flatten()
        .map(|c| c.norm_sqr())
        .sum()
}

/// Accumulated squared Frobenius norm of all pairwise generator commutators.
///
/// Pure function of the parameter list; returns 0.0 for fewer than two
/// rotations.
pub fn lie_penalty(thetas: &[[f64; 3]]) -> f64 {
    let generators: Vec<Mat2> = thetas.iter().map(generator).collect();
    let mut penalty = 0.0;
    for i in 0..generators.len() {
        for j in (i + 1)..generators.len() {
            penalty += frobenius_sq(&commutator(&generators[i], &generators[j]));
        }
    }
    penalty
}
