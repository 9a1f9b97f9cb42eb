//! Per-sample time series.
//!
//! A [`TimeSeries`] is an ordered list of time slices, each a vector of band
//! values. All slices share one dimension, fixed by the first slice.

use crate::error::{Error, Result};
use num_traits::{Num, ToPrimitive};
use std::fmt::Debug;
use tracing::warn;

/// Numeric band value: supports arithmetic, ordering and conversion to `f64`.
///
/// Implemented for every primitive integer and float type.
pub trait Sample: Num + Copy + PartialOrd + ToPrimitive + Debug + Send + Sync {}

impl<T> Sample for T where T: Num + Copy + PartialOrd + ToPrimitive + Debug + Send + Sync {}

/// Time slices of one spatial sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    slices: Vec<Vec<T>>,
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self { slices: Vec::new() }
    }
}

impl<T: Sample> TimeSeries<T> {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from slices, rejecting ragged input.
    pub fn from_slices(slices: Vec<Vec<T>>) -> Result<Self> {
        if let Some(first) = slices.first() {
            let dim = first.len();
            if let Some(s) = slices.iter().find(|s| s.len() != dim) {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: s.len(),
                });
            }
        }
        Ok(Self { slices })
    }

    /// Number of time slices.
    #[inline]
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// True iff there are no time slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Number of bands per slice, `0` for an empty series.
    pub fn dimension(&self) -> usize {
        self.slices.first().map_or(0, Vec::len)
    }

    /// Append a slice. Returns `false` and leaves the series unchanged if its
    /// dimension differs from the existing slices.
    pub fn add_time_slice(&mut self, slice: Vec<T>) -> bool {
        if !self.is_empty() && slice.len() != self.dimension() {
            warn!(
                expected = self.dimension(),
                found = slice.len(),
                "rejecting time slice with mismatched dimension"
            );
            return false;
        }
        self.slices.push(slice);
        true
    }

    /// Slice at `index`, if any.
    pub fn time_slice(&self, index: usize) -> Option<&[T]> {
        self.slices.get(index).map(Vec::as_slice)
    }

    /// Iterate over slices in time order.
    pub fn iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.slices.iter().map(Vec::as_slice)
    }
}
