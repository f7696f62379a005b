//! Error types for the composition engine's ambient layer
//!
//! Merging, resolution and asset lookup never fail: misuse in a definition is
//! reported as a [`Diagnostic`](crate::diagnostics::Diagnostic) and the engine
//! degrades to a best-effort result. Errors here cover the surrounding
//! plumbing, such as loading a [`ComposerConfig`](crate::config::ComposerConfig)
//! from disk.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for blend operations
#[derive(Debug, Error)]
pub enum BlendError {
    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
}

impl BlendError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlendError::ConfigError { .. } => ErrorKind::Config,
            BlendError::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}
