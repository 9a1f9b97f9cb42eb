//! Phenological transition detection on similarity networks.
//!
//! Each time slice of a sample becomes a node. Slices are connected in order
//! of decreasing cosine similarity until the giant component covers a target
//! share of the series, so the network holds the densest temporal regimes and
//! the few links that join them. The transition between two regimes (green-up,
//! senescence) is the node that bridges them: high betweenness, low
//! clustering.
//!
//! ## Pipeline per sample
//!
//! ```text
//! Init → NetworkBuilding → Scoring → PeakSelection → Done | NoPeak
//! ```
//!
//! 1. **NetworkBuilding** ([`build_network`]): candidate edges are slice pairs
//!    in the valid range with similarity above the floor, added by
//!    descending similarity while an [`IncrementalConnectivity`] tracks the
//!    giant component. Unreachable target → `NoPeak`.
//! 2. **Scoring** ([`bridging_scores`]): betweenness / clustering per node.
//! 3. **PeakSelection**: centered moving average of the scores over the valid
//!    range ([`select_peak`]).
//!
//! ## Usage
//!
//! ```rust
//! use phenonet::{PhenoConfig, PhenoDetector, TimeSeries};
//!
//! let slices = vec![
//!     vec![1.0f32, 0.0], vec![1.0, 0.05], vec![1.0, 0.2],
//!     vec![0.2, 1.0], vec![0.05, 1.0], vec![0.0, 1.0],
//! ];
//! let series = TimeSeries::from_slices(slices).unwrap();
//!
//! let config = PhenoConfig::new().with_min_giant_size(5).with_window_size(3);
//! let detector = PhenoDetector::new(vec![series], config).unwrap();
//! let peaks = detector.peak_indices();
//! assert!(peaks[0] == 2 || peaks[0] == 3);
//! ```
//!
//! [`IncrementalConnectivity`]: crate::graph::IncrementalConnectivity
//! [`select_peak`]: crate::moving_average::select_peak

mod config;
mod detector;

pub use config::{GiantTarget, OutsideGiantPolicy, PhenoConfig};
pub use detector::{
    bridging_scores, build_network, detect, Detection, DetectionStage, NoPeakReason,
    PhenoDetector, NO_PEAK,
};
