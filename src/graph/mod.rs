//! Graph engine for similarity networks.
//!
//! - [`WeightedGraph`]: fixed node count, undirected, one weight per pair.
//! - [`IncrementalConnectivity`]: union-find that tracks the giant component
//!   while edges are added.
//! - [`analytics`]: clustering coefficient, Brandes betweenness, connected
//!   components.
//!
//! ```rust
//! use phenonet::graph::{analytics, WeightedGraph};
//!
//! let mut g = WeightedGraph::new(3);
//! g.add_or_update_edge(0, 1, 0.9);
//! g.add_or_update_edge(1, 2, 0.8);
//!
//! let bc = analytics::betweenness_centrality(&g);
//! assert!(bc[1] > bc[0]);
//! ```

pub mod analytics;
mod network;
mod union_find;

pub use analytics::{
    betweenness_centrality, clustering_coefficient, connected_components, giant_component,
};
pub use network::WeightedGraph;
pub use union_find::IncrementalConnectivity;
