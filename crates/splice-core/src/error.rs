//! Error types for Splice.

use thiserror::Error;

/// Main error type for Splice operations.
#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for SpliceError {
    fn from(err: serde_json::Error) -> Self {
        SpliceError::Serialization(err.to_string())
    }
}

/// Result type alias for Splice operations.
pub type Result<T> = std::result::Result<T, SpliceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_errors_become_serialization_errors() {
        let err: SpliceError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, SpliceError::Serialization(_)));
    }
}
