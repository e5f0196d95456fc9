//! Full discretization pipeline: scalar series to Markov chain.
//!
//! Embeds a noisy sine wave, partitions the reconstructed states, builds the
//! symbol transition graph, and prints the validation report as JSON.
//!
//! Run: `cargo run --example series_to_chain`

use latticewalk_core::{
    auto_delay, build_transition_graph, entropy_partition, false_nearest_neighbors,
    normalize_graph, takens_embedding, validate_graph,
};

fn main() {
    env_logger::init();

    // Deterministic noisy sine.
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let series: Vec<f64> = (0..600)
        .map(|t| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let noise = ((state >> 33) as f64 / (1u64 << 31) as f64 - 0.5) * 0.2;
            (t as f64 * 0.15).sin() + noise
        })
        .collect();

    let delay = auto_delay(&series, 60);
    let dim = false_nearest_neighbors(&series, 6, delay, 10.0);
    println!("delay={delay}, embedding dimension={dim}");

    let states = takens_embedding(&series, delay, dim).expect("embedding");
    println!("reconstructed {} state vectors", states.len());

    let partition = entropy_partition(&states, 6, 7).expect("partition");
    println!(
        "partition: {} clusters, {:.4} bits of label entropy",
        partition.n_clusters, partition.entropy
    );

    let graph = build_transition_graph(&partition.labels, true).expect("graph");
    let chain = normalize_graph(&graph);
    let report = validate_graph(&chain, &partition.labels);
    println!(
        "\nvalidation report:\n{}",
        serde_json::to_string_pretty(&report).expect("serialize")
    );
}
