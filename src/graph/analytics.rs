//! Stateless analytics over a [`WeightedGraph`].
//!
//! ## Betweenness (Brandes 2001)
//!
//! For each source `s`, a BFS computes hop distances and the number of
//! shortest paths `σ(s, v)`, recording the predecessors of every node on
//! those paths. Nodes are then popped in reverse visiting order and
//! dependencies are pushed back to their predecessors:
//!
//! ```text
//! δ(s, v) = Σ_{w : v ∈ pred(w)} σ(s, v) / σ(s, w) × (1 + δ(s, w))
//! ```
//!
//! Summing `δ(s, v)` over all sources `s ≠ v` gives the raw betweenness,
//! which is normalised by `(n - 1)(n - 2)`.
//!
//! Path length is hop count. Edge weights are ignored by every function in
//! this module.
//!
//! ## Complexity
//!
//! - Betweenness: O(V·E) time, O(V + E) space per source.
//! - Clustering coefficient: O(d²) per node.
//! - Components: O(V + E).
//!
//! ## References
//!
//! Brandes (2001). "A faster algorithm for betweenness centrality."
//! Journal of Mathematical Sociology 25(2), 163-177.

use super::network::WeightedGraph;
use std::collections::VecDeque;

/// Local clustering coefficient of `node`.
///
/// `2 × (edges among neighbors) / (d × (d - 1))`. Zero when the graph has at
/// most two nodes or `node` has fewer than two neighbors.
pub fn clustering_coefficient(graph: &WeightedGraph, node: usize) -> f64 {
    if graph.size() <= 2 {
        return 0.0;
    }
    let degree = graph.degree(node);
    if degree < 2 {
        return 0.0;
    }

    let neighbors = graph.neighbors(node);
    let mut links = 0usize;
    for (i, &u) in neighbors.iter().enumerate() {
        for &v in &neighbors[i + 1..] {
            if graph.has_edge(u, v) {
                links += 1;
            }
        }
    }
    (2 * links) as f64 / (degree * (degree - 1)) as f64
}

/// Normalised node betweenness centrality, indexed by node id.
///
/// Graphs with at most two nodes have no intermediate nodes, so every entry
/// is `0.0` and no normalisation is applied.
pub fn betweenness_centrality(graph: &WeightedGraph) -> Vec<f64> {
    let n = graph.size();
    let mut betweenness = vec![0.0; n];

    // Buffers reused across sources.
    let mut stack: Vec<usize> = Vec::with_capacity(n);
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut sigma = vec![0.0f64; n];
    let mut delta = vec![0.0f64; n];
    let mut queue = VecDeque::with_capacity(n);

    for source in 0..n {
        stack.clear();
        for p in preds.iter_mut() {
            p.clear();
        }
        dist.fill(None);
        sigma.fill(0.0);
        delta.fill(0.0);

        dist[source] = Some(0);
        sigma[source] = 1.0;
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let next = dist[v].map_or(0, |d| d + 1);
            for w in graph.neighbors_iter(v) {
                if dist[w].is_none() {
                    dist[w] = Some(next);
                    queue.push_back(w);
                }
                if dist[w] == Some(next) {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        while let Some(w) = stack.pop() {
            let coeff = (1.0 + delta[w]) / sigma[w];
            for &v in &preds[w] {
                delta[v] += sigma[v] * coeff;
            }
            if w != source {
                betweenness[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = ((n - 1) * (n - 2)) as f64;
        for b in &mut betweenness {
            *b /= scale;
        }
    }
    betweenness
}

/// Partition all nodes into connected components.
///
/// Components appear in order of their smallest node id; nodes within a
/// component are in BFS order.
pub fn connected_components(graph: &WeightedGraph) -> Vec<Vec<usize>> {
    let n = graph.size();
    let mut visited = vec![false; n];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);

        let mut component = Vec::new();
        while let Some(node) = queue.pop_front() {
            component.push(node);
            for neighbor in graph.neighbors_iter(node) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        components.push(component);
    }

    components
}

/// Nodes of the largest connected component.
///
/// The first component found wins a size tie. Empty for an empty graph.
pub fn giant_component(graph: &WeightedGraph) -> Vec<usize> {
    let mut giant: Vec<usize> = Vec::new();
    for component in connected_components(graph) {
        if component.len() > giant.len() {
            giant = component;
        }
    }
    giant
}
