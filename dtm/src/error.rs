//! Error types for the DTM library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a file into an elevation grid.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The raster file does not exist.
    #[error("Raster file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// IO error when reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but the decoder rejected it.
    #[error("Failed to decode raster {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// The raster decoded, but its layout is not a single-band elevation grid.
    #[error("Unsupported raster {path}: {message}")]
    Unsupported { path: PathBuf, message: String },

    /// The archive could not be read or holds no raster entry.
    #[error("Invalid raster archive {path}: {message}")]
    Archive { path: PathBuf, message: String },
}

/// Errors that can occur when querying a DTM.
#[derive(Error, Debug)]
pub enum DtmError {
    /// Loading the raster failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Pixel coordinate outside `[0, width] × [0, height]`.
    #[error("Pixel out of bounds: x={x}, y={y} (valid: 0..={width}, 0..={height})")]
    OutOfBounds {
        x: f64,
        y: f64,
        width: usize,
        height: usize,
    },

    /// A query was issued before a raster was successfully loaded.
    #[error("No raster loaded")]
    NotLoaded,
}

/// Result type alias using [`DtmError`].
pub type Result<T> = std::result::Result<T, DtmError>;
