//! Data decomposition: assemble per-pixel time series for each worker.
//!
//! Raw input arrives as one buffer per (time slice, band), each holding a
//! value for every pixel of the scene. A [`DecompositionSchema`] assigns each
//! worker a contiguous pixel range. [`BandArena::distribute`] transposes the
//! worker's range into one [`TimeSeries`] per pixel, and [`gather`] puts the
//! per-worker peak indices back in global pixel order.
//!
//! This is the in-process rendition: every worker shares one arena, and the
//! arena is consumed by the distribution so the band buffers are released
//! together once the series are built.

use crate::error::{Error, Result};
use crate::pheno::NO_PEAK;
use crate::series::{Sample, TimeSeries};
use ndarray::{s, Array2, Array3, ArrayView1};
use std::ops::Range;
use tracing::warn;

/// Contiguous pixel ranges per worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompositionSchema {
    /// Pixels handled by each worker.
    counts: Vec<usize>,
    /// First pixel of each worker.
    displacements: Vec<usize>,
}

impl DecompositionSchema {
    /// Build from explicit counts and displacements.
    pub fn new(counts: Vec<usize>, displacements: Vec<usize>) -> Result<Self> {
        if counts.is_empty() {
            return Err(Error::EmptyInput);
        }
        if counts.len() != displacements.len() {
            return Err(Error::DimensionMismatch {
                expected: counts.len(),
                found: displacements.len(),
            });
        }
        Ok(Self {
            counts,
            displacements,
        })
    }

    /// Split `num_pixels` as evenly as possible over `pool_size` workers.
    ///
    /// The first `num_pixels % pool_size` workers take one extra pixel.
    pub fn balanced(num_pixels: usize, pool_size: usize) -> Result<Self> {
        if pool_size == 0 {
            return Err(Error::InvalidParameter {
                name: "pool_size",
                message: "must be positive",
            });
        }
        let base = num_pixels / pool_size;
        let extra = num_pixels % pool_size;
        let counts: Vec<usize> = (0..pool_size)
            .map(|rank| base + usize::from(rank < extra))
            .collect();
        let displacements = counts
            .iter()
            .scan(0, |offset, &c| {
                let start = *offset;
                *offset += c;
                Some(start)
            })
            .collect();
        Self::new(counts, displacements)
    }

    /// Number of workers.
    pub fn pool_size(&self) -> usize {
        self.counts.len()
    }

    /// Pixel range of `rank`, if it is a worker.
    pub fn range(&self, rank: usize) -> Option<Range<usize>> {
        let start = *self.displacements.get(rank)?;
        Some(start..start + self.counts[rank])
    }

    /// Sum of all worker counts.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Check that every range fits in `num_pixels`.
    pub fn validate(&self, num_pixels: usize) -> Result<()> {
        for (task, (&d, &c)) in self.displacements.iter().zip(&self.counts).enumerate() {
            if d + c > num_pixels {
                warn!(task, end = d + c, num_pixels, "decomposition out of bounds");
                return Err(Error::SchemaOutOfBounds {
                    task,
                    end: d + c,
                    num_pixels,
                });
            }
        }
        Ok(())
    }
}

/// Band buffers indexed by (time slice, band), one value per pixel.
#[derive(Debug, Clone)]
pub struct BandArena<T> {
    /// Shape `(slices, bands, pixels)`.
    data: Array3<T>,
    /// Which (slice, band) buffers have been supplied.
    present: Array2<bool>,
}

impl<T: Sample> BandArena<T> {
    /// Empty arena for `num_slices × num_bands` buffers of `num_pixels`.
    pub fn new(num_slices: usize, num_bands: usize, num_pixels: usize) -> Self {
        Self {
            data: Array3::zeros((num_slices, num_bands, num_pixels)),
            present: Array2::from_elem((num_slices, num_bands), false),
        }
    }

    /// `(slices, bands, pixels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Store the buffer for one (slice, band).
    pub fn set_band(&mut self, slice: usize, band: usize, values: &[T]) -> Result<()> {
        let (slices, bands, pixels) = self.shape();
        if slice >= slices || band >= bands {
            return Err(Error::InvalidParameter {
                name: "slice/band",
                message: "outside the arena",
            });
        }
        if values.len() != pixels {
            return Err(Error::DimensionMismatch {
                expected: pixels,
                found: values.len(),
            });
        }
        for (dst, &v) in self.data.slice_mut(s![slice, band, ..]).iter_mut().zip(values) {
            *dst = v;
        }
        self.present[[slice, band]] = true;
        Ok(())
    }

    /// Buffer for one (slice, band), if supplied.
    pub fn band(&self, slice: usize, band: usize) -> Option<ArrayView1<'_, T>> {
        if !*self.present.get([slice, band])? {
            return None;
        }
        Some(self.data.slice(s![slice, band, ..]))
    }

    /// Build the time series of every pixel assigned to `rank`.
    ///
    /// # Errors
    ///
    /// Fails if the arena is empty, a buffer is missing, the schema does not
    /// fit the pixel count, or `rank` is not a worker.
    pub fn distribute(
        self,
        schema: &DecompositionSchema,
        rank: usize,
    ) -> Result<Vec<TimeSeries<T>>> {
        self.check(schema)?;
        let range = schema.range(rank).ok_or(Error::InvalidParameter {
            name: "rank",
            message: "not a worker in the schema",
        })?;
        self.assemble(range)
    }

    /// Build the time series for every worker, indexed by rank.
    pub fn scatter(self, schema: &DecompositionSchema) -> Result<Vec<Vec<TimeSeries<T>>>> {
        self.check(schema)?;
        (0..schema.pool_size())
            .filter_map(|rank| schema.range(rank))
            .map(|range| self.assemble(range))
            .collect()
    }

    fn check(&self, schema: &DecompositionSchema) -> Result<()> {
        let (slices, bands, pixels) = self.shape();
        if slices == 0 || bands == 0 {
            warn!("no input data provided");
            return Err(Error::EmptyInput);
        }
        if let Some(((slice, band), _)) = self.present.indexed_iter().find(|(_, &p)| !p) {
            warn!(slice, band, "missing band buffer");
            return Err(Error::MissingBand { slice, band });
        }
        schema.validate(pixels)
    }

    fn assemble(&self, pixels: Range<usize>) -> Result<Vec<TimeSeries<T>>> {
        let slices = self.shape().0;
        pixels
            .map(|p| {
                let series = (0..slices)
                    .map(|t| self.data.slice(s![t, .., p]).to_vec())
                    .collect();
                TimeSeries::from_slices(series)
            })
            .collect()
    }
}

/// Reassemble per-worker peak indices into global pixel order.
///
/// Pixels not covered by any worker hold [`NO_PEAK`].
pub fn gather(schema: &DecompositionSchema, per_rank: &[Vec<usize>]) -> Result<Vec<usize>> {
    if per_rank.len() != schema.pool_size() {
        return Err(Error::DimensionMismatch {
            expected: schema.pool_size(),
            found: per_rank.len(),
        });
    }
    let len = (0..schema.pool_size())
        .filter_map(|rank| schema.range(rank))
        .map(|r| r.end)
        .max()
        .unwrap_or(0);

    let mut out = vec![NO_PEAK; len];
    for (task, results) in per_rank.iter().enumerate() {
        let Some(range) = schema.range(task) else {
            continue;
        };
        if results.len() != range.len() {
            return Err(Error::GatherMismatch {
                task,
                expected: range.len(),
                found: results.len(),
            });
        }
        out[range].copy_from_slice(results);
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unused_results)]
mod tests {
    use super::*;

    /// Value encodes (slice, band, pixel) so transposition is checkable.
    fn arena(slices: usize, bands: usize, pixels: usize) -> BandArena<i32> {
        let mut a = BandArena::new(slices, bands, pixels);
        for t in 0..slices {
            for b in 0..bands {
                let values: Vec<i32> = (0..pixels).map(|p| (t * 100 + b * 10 + p) as i32).collect();
                a.set_band(t, b, &values).unwrap();
            }
        }
        a
    }

    #[test]
    fn balanced_spreads_remainder_first() {
        let schema = DecompositionSchema::balanced(114, 4).unwrap();
        assert_eq!(schema.range(0), Some(0..29));
        assert_eq!(schema.range(1), Some(29..58));
        assert_eq!(schema.range(2), Some(58..86));
        assert_eq!(schema.range(3), Some(86..114));
        assert_eq!(schema.range(4), None);
        assert_eq!(schema.total(), 114);
        assert!(schema.validate(114).is_ok());
        assert!(matches!(
            schema.validate(100),
            Err(Error::SchemaOutOfBounds { task: 3, .. })
        ));
    }

    #[test]
    fn schema_rejects_bad_shapes() {
        assert!(DecompositionSchema::balanced(10, 0).is_err());
        assert!(DecompositionSchema::new(vec![1, 2], vec![0]).is_err());
        assert!(DecompositionSchema::new(vec![], vec![]).is_err());
    }

    #[test]
    fn distribute_transposes_pixels() {
        let schema = DecompositionSchema::balanced(5, 2).unwrap();
        let series = arena(3, 2, 5).distribute(&schema, 1).unwrap();
        // Rank 1 owns pixels 3 and 4.
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].len(), 3);
        assert_eq!(series[0].dimension(), 2);
        assert_eq!(series[0].time_slice(2), Some(&[203, 213][..]));
        assert_eq!(series[1].time_slice(0), Some(&[4, 14][..]));
    }

    #[test]
    fn scatter_covers_every_rank() {
        let schema = DecompositionSchema::balanced(7, 3).unwrap();
        let per_rank = arena(2, 1, 7).scatter(&schema).unwrap();
        let counts: Vec<usize> = per_rank.iter().map(Vec::len).collect();
        assert_eq!(counts, vec![3, 2, 2]);
        assert_eq!(per_rank[2][1].time_slice(1), Some(&[106][..]));
    }

    #[test]
    fn distribute_fails_on_missing_band() {
        let mut a = BandArena::<f32>::new(2, 2, 3);
        a.set_band(0, 0, &[1.0, 2.0, 3.0]).unwrap();
        a.set_band(0, 1, &[1.0, 2.0, 3.0]).unwrap();
        a.set_band(1, 1, &[1.0, 2.0, 3.0]).unwrap();
        assert!(a.band(1, 0).is_none());
        assert_eq!(a.band(0, 1).unwrap().to_vec(), vec![1.0, 2.0, 3.0]);

        let schema = DecompositionSchema::balanced(3, 1).unwrap();
        assert_eq!(
            a.distribute(&schema, 0).unwrap_err(),
            Error::MissingBand { slice: 1, band: 0 }
        );
    }

    #[test]
    fn distribute_fails_on_bad_input() {
        let schema = DecompositionSchema::balanced(3, 1).unwrap();
        assert_eq!(
            BandArena::<f32>::new(0, 2, 3).distribute(&schema, 0).unwrap_err(),
            Error::EmptyInput
        );
        assert!(arena(2, 1, 3).distribute(&schema, 1).is_err());

        let wide = DecompositionSchema::balanced(4, 1).unwrap();
        assert!(matches!(
            arena(2, 1, 3).distribute(&wide, 0),
            Err(Error::SchemaOutOfBounds { .. })
        ));

        let mut a = BandArena::<f32>::new(1, 1, 3);
        assert!(a.set_band(0, 0, &[1.0]).is_err());
        assert!(a.set_band(1, 0, &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn gather_restores_global_order() {
        let schema = DecompositionSchema::balanced(5, 2).unwrap();
        let out = gather(&schema, &[vec![7, 8, 9], vec![NO_PEAK, 1]]).unwrap();
        assert_eq!(out, vec![7, 8, 9, NO_PEAK, 1]);

        assert!(matches!(
            gather(&schema, &[vec![7, 8], vec![1, 2]]),
            Err(Error::GatherMismatch { task: 0, .. })
        ));
        assert!(gather(&schema, &[vec![7, 8, 9]]).is_err());
    }
}
