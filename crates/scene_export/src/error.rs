//! Error types for scene export
//!
//! Only structural failures surface here. Unsupported shaders, unknown UI
//! labels and missing optional resources are diagnostics, not errors.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Errors raised while constructing elements
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ElementError {
    /// Element kinds become tag names and cannot be empty
    #[error("element kind must not be empty")]
    EmptyKind,
}

/// Errors that abort an export call
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// Writing the scene or a side artifact failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The geometry collaborator failed for a shape
    #[error("Geometry export failed for '{node}': {message}")]
    Geometry {
        /// Transform being exported
        node: String,
        /// Collaborator message
        message: String,
    },

    /// Element construction failed
    #[error("Element error: {0}")]
    Element(#[from] ElementError),
}

impl ExportError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
