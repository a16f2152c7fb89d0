//! Error types for the raster back-end.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while decoding, painting or encoding rasters.
#[derive(Error, Debug)]
pub enum RasterError {
    /// The source file could not be read or decoded.
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// A crop or resize was asked for with zero or out-of-range dimensions.
    #[error("invalid raster geometry: {0}")]
    Geometry(String),

    /// PNG or JPEG encoding failed.
    #[error("encoding failed: {0}")]
    Encode(String),

    /// Writing an encoded file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RasterError {
    /// Create a Geometry error.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Create an Encode error.
    pub fn encode(msg: impl ToString) -> Self {
        Self::Encode(msg.to_string())
    }
}
