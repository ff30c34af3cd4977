//! Error types for stream access, decoding and metadata reads.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain or read a byte stream for a locator.
#[derive(Debug, Error)]
pub enum StreamError {
    /// No data is registered or stored for the locator.
    #[error("No image data found for {0}")]
    NotFound(String),

    /// The source cannot serve locators with this scheme.
    #[error("Unsupported scheme for this source: {0}")]
    UnsupportedScheme(String),

    /// I/O error while opening or reading the stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte stream could not be opened or read.
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    /// The data is not in a recognized or supported format.
    #[error("Invalid or unsupported image format")]
    UnknownFormat,

    /// The image header or body is corrupted or incomplete.
    #[error("Corrupted or incomplete image: {0}")]
    Malformed(String),

    /// The requested target size has a zero dimension.
    #[error("Invalid target size {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },
}

impl From<image::ImageError> for DecodeError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(_) => DecodeError::UnknownFormat,
            image::ImageError::IoError(e) => DecodeError::Stream(StreamError::Io(e)),
            other => DecodeError::Malformed(other.to_string()),
        }
    }
}

/// Failure to read embedded metadata from a local file.
#[derive(Debug, Error)]
pub enum MetadataReadError {
    /// The file could not be opened.
    #[error("Cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The EXIF block is missing or malformed.
    #[error("EXIF error: {0}")]
    Exif(String),
}
