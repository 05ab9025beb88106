//! Image error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or encoding images
#[derive(Error, Debug)]
pub enum ImageError {
    /// The file does not exist
    #[error("Image file not found: {0}")]
    NotFound(PathBuf),

    /// The file extension or byte signature is not a supported format
    #[error("Unknown image format: {0}")]
    UnknownFormat(String),

    /// The data could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Pixel data does not match the declared dimensions
    #[error("Invalid image dimensions {width}x{height} for {len} bytes of RGBA data")]
    InvalidDimensions { width: u32, height: u32, len: usize },

    /// PNG encoding failed
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Filesystem error while reading or writing
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for image operations
pub type Result<T> = std::result::Result<T, ImageError>;
