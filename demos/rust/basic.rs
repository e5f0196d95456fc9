//! Classical vs quantum spreading on the Boolean hypercube.
//!
//! Runs both walks from the same start vertex and prints the peak occupation
//! probability and variance-scaling exponent of each.
//!
//! Run: `cargo run --example basic`

use latticewalk_core::walk::{
    HypercubeCoin, classical_hypercube_time_series, quantum_hypercube_time_series,
};
use latticewalk_core::{hamming_weight_mean_variance, variance_scaling_exponent};

fn main() {
    env_logger::init();

    let dimensions = 4;
    let steps = 8;

    let classical = classical_hypercube_time_series(dimensions, steps, 0)
        .expect("classical walk");
    let quantum = quantum_hypercube_time_series(dimensions, steps, 0, &HypercubeCoin::Hadamard)
        .expect("quantum walk");

    println!("{dimensions}-cube, {steps} steps, start vertex 0\n");
    println!("step  classical_peak  quantum_peak");
    for t in 0..=steps {
        let c_max = classical[t].iter().cloned().fold(0.0, f64::max);
        let q_max = quantum[t].iter().cloned().fold(0.0, f64::max);
        println!("{t:>4}  {c_max:>14.4}  {q_max:>12.4}");
    }

    let exponent = |series: &[Vec<f64>]| {
        let variances: Vec<f64> = series
            .iter()
            .map(|row| hamming_weight_mean_variance(row).variance)
            .collect();
        variance_scaling_exponent(&variances)
    };
    println!("\nvariance scaling: classical alpha={:.3} (diffusive ~ 1)", exponent(&classical));
    println!("variance scaling: quantum   alpha={:.3} (ballistic ~ 2)", exponent(&quantum));
}
