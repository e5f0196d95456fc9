//! Symbol-sequence transition graphs.
//!
//! One node per distinct observed symbol; each consecutive symbol pair
//! increments a directed edge weight. Row-normalization turns the weights into
//! a row-stochastic matrix (a discrete Markov chain), and validation reports
//! the structural contract: counts, connectivity, and row-sum bounds.
//!
//! Storage is BTreeMap-based so iteration order — and therefore every
//! downstream computation — is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{EngineError, Result};

// ---------------------------------------------------------------------------
// Graph type
// ---------------------------------------------------------------------------

/// Weighted transition graph over a symbol alphabet.
#[derive(Debug, Clone)]
pub struct TransitionGraph {
    directed: bool,
    /// Sorted distinct symbols; position is the node index.
    nodes: Vec<usize>,
    /// Adjacency by node index. Undirected graphs store both directions.
    adjacency: Vec<BTreeMap<usize, f64>>,
}

impl TransitionGraph {
    /// Empty graph over the given symbol alphabet.
    pub fn new(symbols: impl IntoIterator<Item = usize>, directed: bool) -> Self {
        let set: BTreeSet<usize> = symbols.into_iter().collect();
        let nodes: Vec<usize> = set.into_iter().collect();
        let adjacency = vec![BTreeMap::new(); nodes.len()];
        Self {
            directed,
            nodes,
            adjacency,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Sorted symbol alphabet.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edge count; undirected edges count once.
    pub fn edge_count(&self) -> usize {
        let stored: usize = self.adjacency.iter().map(|row| row.len()).sum();
        if self.directed {
            stored
        } else {
            // Self-loops are stored once, other edges twice.
            let loops = self
                .adjacency
                .iter()
                .enumerate()
                .filter(|(i, row)| row.contains_key(i))
                .count();
            (stored - loops) / 2 + loops
        }
    }

    /// Node index of a symbol.
    pub fn node_index(&self, symbol: usize) -> Option<usize> {
        self.nodes.binary_search(&symbol).ok()
    }

    /// Weight of the edge between two node indices, if present.
    pub fn weight(&self, from: usize, to: usize) -> Option<f64> {
        self.adjacency.get(from)?.get(&to).copied()
    }

    /// Outgoing (index, weight) pairs of a node.
    pub fn successors(&self, from: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency[from].iter().map(|(&to, &w)| (to, w))
    }

    /// Sum of outgoing edge weights of a node.
    pub fn out_weight(&self, from: usize) -> f64 {
        self.adjacency[from].values().sum()
    }

    /// Add `delta` to the edge weight, creating the edge when absent.
    /// Undirected graphs mirror the update.
    pub fn bump_edge(&mut self, from: usize, to: usize, delta: f64) {
        *self.adjacency[from].entry(to).or_insert(0.0) += delta;
        if !self.directed && from != to {
            *self.adjacency[to].entry(from).or_insert(0.0) += delta;
        }
    }

    /// True when every node can reach every other over the undirected view
    /// (weak connectivity for directed graphs, plain connectivity otherwise).
    pub fn is_connected(&self) -> bool {
        let n = self.nodes.len();
        if n <= 1 {
            return true;
        }
        // Undirected view via BFS.
        let mut undirected: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
        for (from, row) in self.adjacency.iter().enumerate() {
            for &to in row.keys() {
                undirected[from].insert(to);
                undirected[to].insert(from);
            }
        }
        let mut seen = vec![false; n];
        let mut queue = vec![0usize];
        seen[0] = true;
        while let Some(i) = queue.pop() {
            for &j in &undirected[i] {
                if !seen[j] {
                    seen[j] = true;
                    queue.push(j);
                }
            }
        }
        seen.iter().all(|&s| s)
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the transition graph of a symbol sequence.
///
/// Each consecutive pair `(s[i], s[i+1])` bumps the corresponding edge weight
/// by one, creating the edge at weight 1 when absent.
pub fn build_transition_graph(symbols: &[usize], directed: bool) -> Result<TransitionGraph> {
    if symbols.is_empty() {
        return Err(EngineError::InvalidInput("empty symbol sequence".into()));
    }
    let mut graph = TransitionGraph::new(symbols.iter().copied(), directed);
    for pair in symbols.windows(2) {
        // Unwraps can't fail: the alphabet was built from this sequence.
        let from = graph.node_index(pair[0]).unwrap_or(0);
        let to = graph.node_index(pair[1]).unwrap_or(0);
        graph.bump_edge(from, to, 1.0);
    }
    Ok(graph)
}

/// Return a row-normalized copy: every outgoing weight divided by its node's
/// total out-weight.
///
/// Nodes with no outgoing edges keep a row sum of 0 — absorbing states are the
/// caller's concern, not silently patched here.
pub fn normalize_graph(graph: &TransitionGraph) -> TransitionGraph {
    let mut normalized = graph.clone();
    for row in normalized.adjacency.iter_mut() {
        let total: f64 = row.values().sum();
        if total > 0.0 {
            for w in row.values_mut() {
                *w /= total;
            }
        }
    }
    normalized
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Structural report for a transition graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphValidation {
    pub n_nodes: usize,
    pub n_edges: usize,
    /// Weak connectivity for directed graphs, full connectivity otherwise.
    pub connected: bool,
    /// Smallest out-weight row sum (0 for sink nodes).
    pub min_row_sum: f64,
    /// Largest out-weight row sum.
    pub max_row_sum: f64,
    /// Whether the node set covers every distinct symbol of the series.
    pub covers_symbols: bool,
}

/// Report the structural contract of a graph against the symbol series it was
/// built from. This is the test surface for build/normalize round trips.
pub fn validate_graph(graph: &TransitionGraph, original_symbols: &[usize]) -> GraphValidation {
    let mut min_row_sum = f64::INFINITY;
    let mut max_row_sum = f64::NEG_INFINITY;
    for i in 0..graph.node_count() {
        let sum = graph.out_weight(i);
        min_row_sum = min_row_sum.min(sum);
        max_row_sum = max_row_sum.max(sum);
    }
    if graph.node_count() == 0 {
        min_row_sum = 0.0;
        max_row_sum = 0.0;
    }

    let distinct: BTreeSet<usize> = original_symbols.iter().copied().collect();
    let covers_symbols = distinct.iter().all(|s| graph.node_index(*s).is_some());

    GraphValidation {
        n_nodes: graph.node_count(),
        n_edges: graph.edge_count(),
        connected: graph.is_connected(),
        min_row_sum,
        max_row_sum,
        covers_symbols,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_counts_transitions() {
        let symbols = vec![0, 1, 0, 1, 2];
        let g = build_transition_graph(&symbols, true).unwrap();
        assert_eq!(g.node_count(), 3);
        let i0 = g.node_index(0).unwrap();
        let i1 = g.node_index(1).unwrap();
        let i2 = g.node_index(2).unwrap();
        assert_eq!(g.weight(i0, i1), Some(2.0));
        assert_eq!(g.weight(i1, i0), Some(1.0));
        assert_eq!(g.weight(i1, i2), Some(1.0));
        assert_eq!(g.weight(i2, i0), None);
    }

    #[test]
    fn test_build_rejects_empty() {
        assert!(build_transition_graph(&[], true).is_err());
    }

    #[test]
    fn test_normalize_rows_sum_to_one() {
        let symbols = vec![0, 1, 0, 2, 0, 1, 1, 2, 0];
        let g = build_transition_graph(&symbols, true).unwrap();
        let n = normalize_graph(&g);
        for i in 0..n.node_count() {
            let sum = n.out_weight(i);
            if sum > 0.0 {
                assert!((sum - 1.0).abs() < 1e-9, "row {i} sums to {sum}");
            }
        }
        // The original is untouched.
        assert!(g.out_weight(0) > 1.0);
    }

    #[test]
    fn test_normalize_leaves_sink_at_zero() {
        // 2 is terminal: no outgoing transitions.
        let symbols = vec![0, 1, 2];
        let g = build_transition_graph(&symbols, true).unwrap();
        let n = normalize_graph(&g);
        let i2 = n.node_index(2).unwrap();
        assert_eq!(n.out_weight(i2), 0.0);
    }

    #[test]
    fn test_validate_reports_contract() {
        let symbols = vec![3, 7, 3, 9, 7, 3];
        let g = build_transition_graph(&symbols, true).unwrap();
        let n = normalize_graph(&g);
        let report = validate_graph(&n, &symbols);
        assert_eq!(report.n_nodes, 3);
        assert!(report.connected);
        assert!(report.covers_symbols);
        assert!((report.max_row_sum - 1.0).abs() < 1e-9);
        assert!(report.min_row_sum >= 0.0);
    }

    #[test]
    fn test_undirected_edge_count_and_connectivity() {
        let symbols = vec![0, 1, 2, 1, 0];
        let g = build_transition_graph(&symbols, false).unwrap();
        // Edges {0,1} and {1,2}, each counted once.
        assert_eq!(g.edge_count(), 2);
        assert!(g.is_connected());
        // Undirected bump mirrors both directions.
        let i0 = g.node_index(0).unwrap();
        let i1 = g.node_index(1).unwrap();
        assert_eq!(g.weight(i0, i1), g.weight(i1, i0));
    }

    #[test]
    fn test_disconnected_detected() {
        let mut g = TransitionGraph::new([0, 1, 2, 3], true);
        g.bump_edge(0, 1, 1.0);
        g.bump_edge(2, 3, 1.0);
        assert!(!g.is_connected());
    }

    #[test]
    fn test_self_loop_counted_once_undirected() {
        let symbols = vec![5, 5, 5];
        let g = build_transition_graph(&symbols, false).unwrap();
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.weight(0, 0), Some(2.0));
    }
}
