//! Fixed-size undirected weighted graph.
//!
//! Nodes are `0..size`, fixed at construction. Each node owns an adjacency
//! list `(neighbor, weight)` in insertion order plus a `neighbor -> slot`
//! index, so edge lookup is O(1) amortized and walking the neighbors of a
//! node visits them in the same order on every run. Floating-point sums in
//! the analytics depend on that order.
//!
//! Out-of-range node ids never panic: mutations become no-ops and queries
//! return `false`/empty/`0`, with a `tracing` warning. The analytics in
//! [`super::analytics`] index by raw time-slice counts, so this check is
//! the last line before an out-of-bounds access.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use tracing::warn;

/// Undirected graph with one weight per unordered node pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedGraph {
    /// Adjacency: node -> [(neighbor, weight)], insertion order
    adj: Vec<Vec<(usize, f64)>>,
    /// node -> {neighbor: slot in `adj[node]`}
    slots: Vec<HashMap<usize, usize>>,
}

impl WeightedGraph {
    /// Create a graph with `size` isolated nodes.
    pub fn new(size: usize) -> Self {
        Self {
            adj: vec![Vec::new(); size],
            slots: vec![HashMap::new(); size],
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn size(&self) -> usize {
        self.adj.len()
    }

    /// Alias of [`size`](Self::size).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.size()
    }

    /// True iff the graph has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Set the weight between `a` and `b`, overwriting any previous weight.
    ///
    /// Self-loops are ignored.
    pub fn add_or_update_edge(&mut self, a: usize, b: usize, weight: f64) {
        if !self.validate(a) || !self.validate(b) {
            return;
        }
        if a == b {
            warn!(node = a, "ignoring self-loop");
            return;
        }
        self.set_half(a, b, weight);
        self.set_half(b, a, weight);
    }

    /// Whether `a` and `b` are adjacent.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.validate(a) && self.validate(b) && self.slots[a].contains_key(&b)
    }

    /// Weight of the edge between `a` and `b`, if any.
    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        if !self.validate(a) || !self.validate(b) {
            return None;
        }
        self.slots[a].get(&b).map(|&slot| self.adj[a][slot].1)
    }

    /// Neighbors of `node`, in the order their edges were first added.
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        if !self.validate(node) {
            return Vec::new();
        }
        self.neighbors_iter(node).collect()
    }

    /// Iterate neighbors of a node known to be valid.
    #[inline]
    pub(crate) fn neighbors_iter(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj[node].iter().map(|&(nbr, _)| nbr)
    }

    /// Number of neighbors of `node`.
    pub fn degree(&self, node: usize) -> usize {
        if !self.validate(node) {
            return 0;
        }
        self.adj[node].len()
    }

    /// Build from a petgraph undirected graph, keeping its node indices.
    ///
    /// Parallel edges collapse to the last weight seen; self-loops are dropped.
    pub fn from_petgraph<N>(graph: &UnGraph<N, f64>) -> Self {
        let mut g = Self::new(graph.node_count());
        for edge in graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            if a != b {
                g.add_or_update_edge(a, b, *edge.weight());
            }
        }
        g
    }

    /// Convert to a petgraph undirected graph with the same node indices.
    pub fn to_petgraph(&self) -> UnGraph<(), f64> {
        let mut graph = UnGraph::<(), f64>::with_capacity(self.size(), self.edge_count());
        for _ in 0..self.size() {
            let _ = graph.add_node(());
        }
        for (a, nbrs) in self.adj.iter().enumerate() {
            for &(b, w) in nbrs {
                if a < b {
                    let _ = graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), w);
                }
            }
        }
        graph
    }

    fn set_half(&mut self, from: usize, to: usize, weight: f64) {
        match self.slots[from].get(&to) {
            Some(&slot) => self.adj[from][slot].1 = weight,
            None => {
                let _ = self.slots[from].insert(to, self.adj[from].len());
                self.adj[from].push((to, weight));
            }
        }
    }

    fn validate(&self, node: usize) -> bool {
        if node >= self.size() {
            warn!(node, size = self.size(), "invalid node id");
            return false;
        }
        true
    }
}
