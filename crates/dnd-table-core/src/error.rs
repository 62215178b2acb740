//! Error types for dnd-table.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Keystroke string that cannot be bound.
    #[error("Invalid keystroke: {0}")]
    InvalidKeystroke(String),
}

/// Errors loading table records.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Two sibling rows share a key.
    #[error("Duplicate row key: {0}")]
    DuplicateKey(String),
}
