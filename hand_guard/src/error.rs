// THEORY:
// Errors in this crate only ever come from the collaborators around the core:
// the video source, the display sink and image decoding. The detection and
// classification path has no error type at all. Degenerate geometry (empty
// masks, undersized blobs, zero moments) is a defined outcome, not a failure,
// so it is expressed through `Detection` and `CentroidMethod` instead.

use thiserror::Error;

/// Every failure a proximity-guard session can surface to its caller.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The video source could not be opened or stopped producing frames abnormally.
    #[error("video source error: {0}")]
    Source(String),

    /// The display sink failed to show a frame or tear down.
    #[error("display sink error: {0}")]
    Sink(String),

    /// A rendering backend rejected a draw call.
    #[error("render error: {0}")]
    Render(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GuardError>;
