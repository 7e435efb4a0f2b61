//! Error types for the obfuscation engine.
//!
//! Obfuscation itself never fails; these errors only come from the edges
//! (loading configuration, reading or writing mapping snapshots).

use thiserror::Error;

/// Result type for engine edge operations.
pub type Result<T> = std::result::Result<T, ObfuscateError>;

/// Errors that can occur while configuring the engine or persisting mappings.
#[derive(Error, Debug)]
pub enum ObfuscateError {
    /// Invalid or unreadable engine configuration.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error during config or snapshot file operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or encoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ObfuscateError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        ObfuscateError::Config(msg.into())
    }
}
