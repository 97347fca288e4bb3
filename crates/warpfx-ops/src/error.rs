//! Error types for resampling operations.

use thiserror::Error;

/// Error type for resampling operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// The transform has no inverse (zero or non-finite determinant).
    #[error("non-invertible transform: {0}")]
    NonInvertible(String),

    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The cancellation token fired before every row block was written.
    #[error("operation cancelled")]
    Cancelled,

    /// Error bubbled up from the image container.
    #[error(transparent)]
    Core(#[from] warpfx_core::Error),
}

impl OpsError {
    /// Returns true for [`OpsError::Cancelled`].
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type for resampling operations.
pub type OpsResult<T> = Result<T, OpsError>;
