use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with [`VectraceError`].
pub type VectraceResult<T> = std::result::Result<T, VectraceError>;

/// Error types that can occur while vectorizing a raster.
///
/// Only failures that the caller has to act on live here. Degenerate
/// boundaries and collapsed simplifications are absorbed inside the
/// pipeline, and an all-background image is a successful, empty trace.
#[derive(Debug, Error)]
pub enum VectraceError {
    /// The raster could not be decoded or has zero area.
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },
    /// Image encoding error (e.g. while exporting a bitmap).
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Input file not found at the specified path.
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },
}

impl VectraceError {
    pub(crate) fn invalid_image(reason: impl Into<String>) -> Self {
        VectraceError::InvalidImage {
            reason: reason.into(),
        }
    }
}
