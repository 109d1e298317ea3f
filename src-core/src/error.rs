//! Error types for spectrogram rendering.

use thiserror::Error;

/// Result type for spectrogram operations.
pub type Result<T> = std::result::Result<T, SpectrogramError>;

/// Errors that can occur while rendering a spectrogram.
///
/// Every variant is terminal: a failed stage aborts the whole pipeline and
/// no partial image is produced. Callers retry the entire render if desired.
#[derive(Debug, Error)]
pub enum SpectrogramError {
    /// The audio source could not be opened or read (missing file,
    /// corrupt data, unsupported format).
    #[error("audio source unreadable: {0}")]
    SourceUnreadable(String),

    /// The audio source holds no usable signal (zero frames / zero
    /// duration). Detected up front, before any division by duration.
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),

    /// The rendered image could not be encoded or written. The sink writes
    /// through a temporary file, so no partial output is left behind.
    #[error("image sink write failed: {0}")]
    SinkWriteFailure(String),

    /// Rendering parameters are inconsistent (e.g. overlap not smaller than
    /// the block size).
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl From<hound::Error> for SpectrogramError {
    fn from(err: hound::Error) -> Self {
        SpectrogramError::SourceUnreadable(err.to_string())
    }
}

impl From<image::ImageError> for SpectrogramError {
    fn from(err: image::ImageError) -> Self {
        SpectrogramError::SinkWriteFailure(err.to_string())
    }
}
