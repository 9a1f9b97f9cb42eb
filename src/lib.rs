//! # phenonet
//!
//! Phenological transition detection for remote-sensing time series.
//!
//! Every time slice of a spatial sample becomes a node of a similarity
//! network. The network is grown from the most similar slice pairs until its
//! giant component is large enough, and the slice that best bridges two
//! temporal regimes (high betweenness, low clustering) is reported as the
//! transition point.
//!
//! - [`graph`]: weighted graph, incremental connectivity, analytics.
//! - [`similarity`], [`moving_average`]: scoring primitives.
//! - [`pheno`]: the per-sample detector.
//! - [`decomposition`]: assembling per-pixel series from band buffers and
//!   gathering results back.
//!
//! The **`parallel`** feature (default) runs samples concurrently with rayon.

pub mod decomposition;
/// Error types used across `phenonet`.
pub mod error;
pub mod graph;
pub mod moving_average;
pub mod pheno;
pub mod series;
pub mod similarity;

#[cfg(test)]
mod pheno_tests;

pub use decomposition::{gather, BandArena, DecompositionSchema};
pub use error::{Error, Result};
pub use graph::{IncrementalConnectivity, WeightedGraph};
pub use moving_average::select_peak;
pub use pheno::{
    Detection, GiantTarget, NoPeakReason, OutsideGiantPolicy, PhenoConfig, PhenoDetector, NO_PEAK,
};
pub use series::{Sample, TimeSeries};
pub use similarity::cosine_similarity;
