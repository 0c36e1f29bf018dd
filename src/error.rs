// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the I/O and CLI edge of the library.
//!
//! The numeric pipeline itself never fails: missing or degenerate data is
//! replaced by documented sentinel values. Errors only arise when reading
//! frame files or statistics files, or from invalid CLI weights.

use std::fmt;

/// Result type alias for feature-extraction operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Main error type for the feature-extraction library.
#[derive(Debug)]
pub enum FeatureError {
    /// IO error with context (file not found, permission denied, etc.).
    IoError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
    /// Malformed keypoint frames or statistics file.
    ParseError(String),
    /// Invalid configuration provided.
    ConfigError(String),
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for FeatureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FeatureError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for FeatureError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}
