//! Error handling for modprune
//!
//! Only two classes of failure abort a run: missing root modules and I/O on the
//! property file (plus a registry that cannot be loaded at all). Data-quality
//! problems inside the module graph are reported as diagnostics instead, see
//! [`crate::logic::resolver::Diagnostic`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for modprune
#[derive(Error, Debug)]
pub enum ModpruneError {
    /// One or more declared root modules are absent from the universe
    #[error("Root modules not found: {}", .0.join(", "))]
    MissingRootModules(Vec<String>),

    /// An existing property file could not be read
    #[error("Failed to read properties from {}: {source}", .path.display())]
    ReadProperties {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The property file could not be written
    #[error("Failed to write properties to {}: {source}", .path.display())]
    WriteProperties {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The module registry could not be loaded
    #[error("Registry error: {0}")]
    Registry(String),

    /// Configuration errors (missing registry, invalid roots)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors not tied to the property file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for modprune operations
pub type Result<T> = std::result::Result<T, ModpruneError>;

impl ModpruneError {
    /// Create a registry error
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a read error for the property file at `path`
    pub fn read_properties(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadProperties {
            path: path.into(),
            source,
        }
    }

    /// Create a write error for the property file at `path`
    pub fn write_properties(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteProperties {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this failure.
    ///
    /// Every fatal outcome maps to 1; clap keeps 2 for usage errors.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
