//! Transcode error types.

use std::path::PathBuf;

use image::ImageError;
use thiserror::Error;

/// Errors raised while turning a logo into a transparent PNG.
///
/// All of them are fatal; nothing is written once one occurs.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("input image `{0}` not found")]
    InputNotFound(PathBuf),

    #[error("failed to decode `{0}`")]
    Decode(PathBuf, #[source] ImageError),

    #[error("failed to encode PNG")]
    Encode(#[source] ImageError),

    #[error("failed to write `{0}`")]
    OutputWrite(PathBuf, #[source] std::io::Error),
}

impl TranscodeError {
    /// Classify an `image::open` failure for `path`.
    pub(super) fn from_open(path: PathBuf, err: ImageError) -> Self {
        match err {
            ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                Self::InputNotFound(path)
            }
            other => Self::Decode(path, other),
        }
    }
}
