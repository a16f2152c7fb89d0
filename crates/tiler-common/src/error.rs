//! Error types for layer-tiler crates.

use std::path::PathBuf;

use thiserror::Error;

use crate::tile::TileCoord;

/// Result type alias using TilerError.
pub type TilerResult<T> = Result<T, TilerError>;

/// Primary error type for pyramid rendering.
#[derive(Debug, Error)]
pub enum TilerError {
    // === Configuration Errors ===
    #[error("Unknown projection kind: {0}")]
    UnknownProjection(String),

    #[error("Invalid configuration value for '{param}': {message}")]
    InvalidConfig { param: String, message: String },

    // === Source Errors ===
    #[error("Failed to decode source image {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("No source image has been opened")]
    NoSource,

    // === Output Errors ===
    #[error("Failed to create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to crop source for tile {coord}: {message}")]
    Crop { coord: TileCoord, message: String },

    #[error("Failed to encode tile {coord}: {message}")]
    Encode { coord: TileCoord, message: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Pipeline Errors ===
    #[error("Step '{step}' failed: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<TilerError>,
    },
}

impl TilerError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a Decode error.
    pub fn decode(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// The error that originally caused a failed step.
    pub fn root(&self) -> &TilerError {
        match self {
            TilerError::Step { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error was caused by bad configuration rather than I/O.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self.root(),
            TilerError::UnknownProjection(_) | TilerError::InvalidConfig { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_keeps_root_cause() {
        let err = TilerError::Step {
            step: "render zoom 3".to_string(),
            source: Box::new(TilerError::UnknownProjection("albers".to_string())),
        };

        assert!(err.is_config_error());
        assert!(matches!(err.root(), TilerError::UnknownProjection(_)));
        assert_eq!(
            err.to_string(),
            "Step 'render zoom 3' failed: Unknown projection kind: albers"
        );
    }
}
