//! Error types for the filtering engine and its loading collaborators.

use cancellable_loops::Aborted;
use thiserror::Error;

/// Errors that can occur while loading a raster or running a filter pass
#[derive(Debug, Error)]
pub enum FilterError {
    /// Height or width is zero
    #[error("invalid dimensions: {height}x{width} (height and width must be > 0)")]
    InvalidDimensions {
        /// Requested height in rows
        height: usize,
        /// Requested width in columns
        width: usize,
    },

    /// Two arrays that must share a shape do not
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Shape of the reference array as (rows, cols)
        expected: (usize, usize),
        /// Shape that was supplied
        actual: (usize, usize),
    },

    /// Sample buffer length does not match `height * width`
    #[error("sample count mismatch: expected {expected}, got {actual}")]
    SampleCount { expected: usize, actual: usize },

    /// A radius of zero was supplied where a positive one is required
    #[error("invalid radius: {0} (radii must be positive)")]
    InvalidRadius(u32),

    /// Standard image decoding failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// TIFF raster decoding failed
    #[error("tiff error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file type or sample layout is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The computation was superseded by a newer request
    #[error("computation cancelled")]
    Cancelled,

    /// The worker thread is gone
    #[error("worker channel disconnected")]
    Disconnected,
}

impl From<Aborted> for FilterError {
    fn from(_: Aborted) -> Self {
        FilterError::Cancelled
    }
}

/// Result type for filtering operations
pub type FilterResult<T> = Result<T, FilterError>;
