//! Detection parameters.

use crate::error::{Error, Result};
use crate::similarity::EPSILON;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Giant component size a similarity network must reach to be valid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GiantTarget {
    /// Fraction of the series length, in `(0, 1]`.
    Fraction(f64),
    /// Absolute node count.
    Size(usize),
}

impl GiantTarget {
    /// Target node count for a series of `len` time slices.
    pub fn resolve(&self, len: usize) -> usize {
        match *self {
            GiantTarget::Fraction(f) => (len as f64 * f).floor() as usize,
            GiantTarget::Size(s) => s,
        }
    }
}

/// What scoring does on meeting a node outside the giant component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutsideGiantPolicy {
    /// Zero that node and stop scoring; later nodes keep their raw
    /// normalised betweenness.
    #[default]
    StopAtFirst,
    /// Zero only the outside nodes and keep scoring the rest.
    SkipOutside,
}

/// Configuration for [`PhenoDetector`](super::PhenoDetector).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhenoConfig {
    giant_target: GiantTarget,
    window_size: usize,
    outside_policy: OutsideGiantPolicy,
    similarity_floor: f64,
}

impl PhenoConfig {
    /// Defaults: 80% giant component, window of 5, stop at first outside node.
    pub fn new() -> Self {
        Self {
            giant_target: GiantTarget::Fraction(0.8),
            window_size: 5,
            outside_policy: OutsideGiantPolicy::StopAtFirst,
            similarity_floor: EPSILON,
        }
    }

    /// Set the giant component target as a fraction of the series length.
    pub fn with_min_giant_fraction(mut self, fraction: f64) -> Self {
        self.giant_target = GiantTarget::Fraction(fraction);
        self
    }

    /// Set the giant component target as an absolute node count.
    pub fn with_min_giant_size(mut self, size: usize) -> Self {
        self.giant_target = GiantTarget::Size(size);
        self
    }

    /// Set the moving-average window used for peak selection.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the scoring policy for nodes outside the giant component.
    pub fn with_outside_policy(mut self, policy: OutsideGiantPolicy) -> Self {
        self.outside_policy = policy;
        self
    }

    /// Set the similarity below which slice pairs are never connected.
    pub fn with_similarity_floor(mut self, floor: f64) -> Self {
        self.similarity_floor = floor;
        self
    }

    /// Giant component target.
    pub fn giant_target(&self) -> GiantTarget {
        self.giant_target
    }

    /// Moving-average window size.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Outside-giant scoring policy.
    pub fn outside_policy(&self) -> OutsideGiantPolicy {
        self.outside_policy
    }

    /// Minimum similarity for a candidate edge.
    pub fn similarity_floor(&self) -> f64 {
        self.similarity_floor
    }

    /// Check every parameter.
    pub fn validate(&self) -> Result<()> {
        match self.giant_target {
            GiantTarget::Fraction(f) if !(f > 0.0 && f <= 1.0) => {
                return Err(Error::InvalidParameter {
                    name: "min_giant_fraction",
                    message: "must be in (0, 1]",
                });
            }
            GiantTarget::Size(0) => {
                return Err(Error::InvalidParameter {
                    name: "min_giant_size",
                    message: "must be positive",
                });
            }
            _ => {}
        }
        if self.window_size == 0 {
            return Err(Error::InvalidParameter {
                name: "window_size",
                message: "must be positive",
            });
        }
        if !self.similarity_floor.is_finite() {
            return Err(Error::InvalidParameter {
                name: "similarity_floor",
                message: "must be finite",
            });
        }
        Ok(())
    }
}

impl Default for PhenoConfig {
    fn default() -> Self {
        Self::new()
    }
}
