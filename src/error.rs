//! Error types for posture-viz operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, analyzing, or rendering.
///
/// Configuration variants are fatal and surface at startup. Landmark and
/// detection variants are recovered inside the frame path and only ever
/// reach the log.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// PNG decoding error.
    #[error("PNG decoding error: {0}")]
    PngDecoding(#[from] png::DecodingError),

    /// Invalid dimensions for a frame buffer or pixel payload.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Configuration file not found or unreadable.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigInvalid {
        /// The configuration key with the invalid value.
        key: String,
        /// Why the value is invalid.
        message: String,
    },

    /// A required metric entry is missing from a configuration table.
    #[error("missing '{key}' entry in {table} table")]
    MissingConfigKey {
        /// Table name (`thresholds` or `advice`).
        table: &'static str,
        /// Metric key that was expected.
        key: &'static str,
    },

    /// A landmark index is past the end of the detected pose.
    #[error("landmark index {index} out of range for pose with {len} landmarks")]
    LandmarkOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of landmarks in the pose.
        len: usize,
    },

    /// A landmark carries a non-finite coordinate or confidence.
    #[error("invalid landmark {index}: {message}")]
    InvalidLandmark {
        /// Landmark index.
        index: usize,
        /// What is wrong with it.
        message: String,
    },

    /// The external pose detector failed.
    #[error("detection failed: {0}")]
    Detection(String),

    /// A recorded detection stream could not be read.
    #[error("invalid recording: {0}")]
    Recording(String),
}
