use thiserror::Error;

/// Result alias for `phenonet`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by time series construction, configuration and the
/// decomposition layer.
///
/// Graph and connectivity queries never fail: invalid node ids degrade to a
/// safe default and emit a `tracing` diagnostic instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Time slice dimension mismatch.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A `[start, end)` time range that does not fit the series.
    #[error("invalid time range [{start}, {end}) for a series of {len} slices")]
    InvalidTimeRange {
        /// Inclusive start.
        start: usize,
        /// Exclusive end.
        end: usize,
        /// Number of time slices in the series.
        len: usize,
    },

    /// A decomposition schema assigns pixels past the end of the data.
    #[error("schema out of bounds: task #{task} reaches pixel {end}, data has {num_pixels}")]
    SchemaOutOfBounds {
        /// Offending task rank.
        task: usize,
        /// One past the last pixel assigned to the task.
        end: usize,
        /// Number of pixels in the data.
        num_pixels: usize,
    },

    /// A band buffer was never supplied.
    #[error("missing data for time slice #{slice} band #{band}")]
    MissingBand {
        /// Time slice index.
        slice: usize,
        /// Band index.
        band: usize,
    },

    /// Per-rank results do not line up with the schema.
    #[error("gather mismatch for task #{task}: expected {expected} results, found {found}")]
    GatherMismatch {
        /// Offending task rank.
        task: usize,
        /// Count assigned by the schema.
        expected: usize,
        /// Count actually supplied.
        found: usize,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
