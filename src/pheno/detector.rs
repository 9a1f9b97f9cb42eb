//! Per-sample peak detection.

use super::config::{OutsideGiantPolicy, PhenoConfig};
use crate::error::{Error, Result};
use crate::graph::{
    betweenness_centrality, clustering_coefficient, giant_component, IncrementalConnectivity,
    WeightedGraph,
};
use crate::moving_average::select_peak;
use crate::series::{Sample, TimeSeries};
use crate::similarity::{cosine_similarity, EPSILON};
use std::ops::Range;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sentinel index for samples without a peak.
pub const NO_PEAK: usize = usize::MAX;

/// Stages a sample moves through during detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionStage {
    /// Inputs checked.
    Init,
    /// Growing the similarity network.
    NetworkBuilding,
    /// Computing bridging coefficients.
    Scoring,
    /// Moving-average scan over the scores.
    PeakSelection,
    /// Peak found.
    Done,
    /// No peak could be determined.
    NoPeak,
}

/// Why a sample has no peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPeakReason {
    /// Fewer than three time slices; betweenness is degenerate.
    TooShort {
        /// Series length.
        len: usize,
    },
    /// The valid range does not fit the series.
    InvalidRange {
        /// Inclusive start.
        start: usize,
        /// Exclusive end.
        end: usize,
        /// Series length.
        len: usize,
    },
    /// The network never reached the giant component target.
    InsufficientConnectivity {
        /// Required giant component size.
        target: usize,
    },
    /// The moving-average scan found no valid window in range.
    NoValidWindow,
}

/// Outcome for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detection {
    /// Transition found at time slice `index` with bridging coefficient `score`.
    Peak {
        /// Selected time slice.
        index: usize,
        /// Bridging coefficient of that slice.
        score: f64,
    },
    /// No peak determined.
    NoPeak(NoPeakReason),
}

impl Detection {
    /// Peak index, if any.
    pub fn index(&self) -> Option<usize> {
        match *self {
            Detection::Peak { index, .. } => Some(index),
            Detection::NoPeak(_) => None,
        }
    }

    /// Peak index, or [`NO_PEAK`].
    pub fn index_or_sentinel(&self) -> usize {
        self.index().unwrap_or(NO_PEAK)
    }

    /// Terminal stage of this outcome.
    pub fn stage(&self) -> DetectionStage {
        match self {
            Detection::Peak { .. } => DetectionStage::Done,
            Detection::NoPeak(_) => DetectionStage::NoPeak,
        }
    }
}

/// Grow a similarity network over the slices in `range`.
///
/// Every pair in `range` with cosine similarity at least `floor` is a
/// candidate edge. Candidates are added from most to least similar until the
/// giant component holds `target` nodes. The graph always has one node per
/// slice of the whole series; slices outside `range` stay isolated.
///
/// Returns `None` if the target cannot be reached.
pub fn build_network<T: Sample>(
    series: &TimeSeries<T>,
    range: Range<usize>,
    target: usize,
    floor: f64,
) -> Option<WeightedGraph> {
    let n = series.len();
    let range = range.start.min(n)..range.end.min(n);

    let mut candidates: Vec<(usize, usize, f64)> = Vec::new();
    let mut touched = vec![false; n];
    for i in range.clone() {
        let Some(a) = series.time_slice(i) else {
            continue;
        };
        for j in i + 1..range.end {
            let Some(b) = series.time_slice(j) else {
                continue;
            };
            let weight = cosine_similarity(a, b);
            if weight >= floor {
                candidates.push((i, j, weight));
                touched[i] = true;
                touched[j] = true;
            }
        }
    }

    // Not enough connectable nodes: skip the growth loop entirely.
    if touched.iter().filter(|&&t| t).count() < target {
        return None;
    }

    candidates.sort_by(|x, y| y.2.total_cmp(&x.2));

    let mut graph = WeightedGraph::new(n);
    let mut uf = IncrementalConnectivity::new(n);
    for (a, b, w) in candidates {
        if uf.giant_component_size() >= target {
            break;
        }
        graph.add_or_update_edge(a, b, w);
        uf.union(a, b);
    }

    (uf.giant_component_size() >= target).then_some(graph)
}

/// Bridging coefficient (betweenness / clustering) of every node.
///
/// Nodes are scored in index order. A node outside the giant component scores
/// zero; under [`OutsideGiantPolicy::StopAtFirst`] scoring stops there and
/// every later node keeps its raw normalised betweenness. Nodes whose
/// clustering coefficient is below [`EPSILON`] also score zero.
pub fn bridging_scores(graph: &WeightedGraph, policy: OutsideGiantPolicy) -> Vec<f64> {
    let n = graph.size();
    let mut in_giant = vec![false; n];
    for v in giant_component(graph) {
        in_giant[v] = true;
    }

    let mut scores = betweenness_centrality(graph);
    for v in 0..n {
        if !in_giant[v] {
            match policy {
                OutsideGiantPolicy::StopAtFirst => {
                    scores[v] = 0.0;
                    break;
                }
                OutsideGiantPolicy::SkipOutside => {
                    scores[v] = 0.0;
                    continue;
                }
            }
        }
        let cc = clustering_coefficient(graph, v);
        scores[v] = if cc < EPSILON { 0.0 } else { scores[v] / cc };
    }
    scores
}

/// Detect the transition point of one series within `range`.
pub fn detect<T: Sample>(
    series: &TimeSeries<T>,
    range: Range<usize>,
    config: &PhenoConfig,
) -> Detection {
    let len = series.len();
    debug!(stage = ?DetectionStage::Init, len, ?range);

    if len < 3 {
        return no_peak(NoPeakReason::TooShort { len });
    }
    if range.start >= range.end || range.end > len {
        return no_peak(NoPeakReason::InvalidRange {
            start: range.start,
            end: range.end,
            len,
        });
    }

    let target = config.giant_target().resolve(len);
    debug!(stage = ?DetectionStage::NetworkBuilding, target);
    let Some(network) = build_network(series, range.clone(), target, config.similarity_floor())
    else {
        warn!(
            len,
            giant_target = target,
            "similarity network never reached the giant component target"
        );
        return no_peak(NoPeakReason::InsufficientConnectivity { target });
    };

    debug!(stage = ?DetectionStage::Scoring, edges = network.edge_count());
    let scores = bridging_scores(&network, config.outside_policy());

    debug!(stage = ?DetectionStage::PeakSelection, window = config.window_size());
    match select_peak(&scores, config.window_size(), range, 0.0, f64::INFINITY) {
        Some(index) if index < len => {
            let score = scores[index];
            debug!(stage = ?DetectionStage::Done, index, score);
            Detection::Peak { index, score }
        }
        _ => no_peak(NoPeakReason::NoValidWindow),
    }
}

fn no_peak(reason: NoPeakReason) -> Detection {
    debug!(stage = ?DetectionStage::NoPeak, ?reason);
    Detection::NoPeak(reason)
}

/// Runs detection over every sample handed to one worker.
#[derive(Debug, Clone)]
pub struct PhenoDetector<T> {
    samples: Vec<TimeSeries<T>>,
    /// Per-sample `[start, end)` override; `None` means the whole series.
    ranges: Vec<Option<Range<usize>>>,
    config: PhenoConfig,
}

impl<T: Sample> PhenoDetector<T> {
    /// Take ownership of `samples`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `config` is invalid.
    pub fn new(samples: Vec<TimeSeries<T>>, config: PhenoConfig) -> Result<Self> {
        config.validate()?;
        let ranges = vec![None; samples.len()];
        Ok(Self {
            samples,
            ranges,
            config,
        })
    }

    /// Restrict detection for sample `sample` to `[range.start, range.end)`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] for an unknown sample,
    /// [`Error::InvalidTimeRange`] if the range is empty or runs past the
    /// series.
    pub fn with_time_range(mut self, sample: usize, range: Range<usize>) -> Result<Self> {
        let len = self
            .samples
            .get(sample)
            .map(TimeSeries::len)
            .ok_or(Error::InvalidParameter {
                name: "sample",
                message: "index out of bounds",
            })?;
        if range.start >= range.end || range.end > len {
            return Err(Error::InvalidTimeRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        self.ranges[sample] = Some(range);
        Ok(self)
    }

    /// Samples in input order.
    pub fn samples(&self) -> &[TimeSeries<T>] {
        &self.samples
    }

    /// Active configuration.
    pub fn config(&self) -> &PhenoConfig {
        &self.config
    }

    /// Valid range used for sample `sample`.
    pub fn time_range(&self, sample: usize) -> Option<Range<usize>> {
        let series = self.samples.get(sample)?;
        Some(self.ranges[sample].clone().unwrap_or(0..series.len()))
    }

    /// Detect every sample, in input order.
    pub fn process(&self) -> Vec<Detection> {
        let run = |(series, range): (&TimeSeries<T>, &Option<Range<usize>>)| {
            let range = range.clone().unwrap_or(0..series.len());
            detect(series, range, &self.config)
        };

        #[cfg(feature = "parallel")]
        let detections: Vec<Detection> = self
            .samples
            .par_iter()
            .zip(self.ranges.par_iter())
            .map(run)
            .collect();

        #[cfg(not(feature = "parallel"))]
        let detections: Vec<Detection> = self
            .samples
            .iter()
            .zip(self.ranges.iter())
            .map(run)
            .collect();

        let found = detections.iter().filter(|d| d.index().is_some()).count();
        info!(samples = detections.len(), peaks = found, "phenology detection finished");
        detections
    }

    /// Peak index per sample, [`NO_PEAK`] where none was found.
    pub fn peak_indices(&self) -> Vec<usize> {
        self.process()
            .iter()
            .map(Detection::index_or_sentinel)
            .collect()
    }
}
