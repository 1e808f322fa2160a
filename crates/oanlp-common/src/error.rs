use thiserror::Error;

#[derive(Debug, Error)]
pub enum OaNlpError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Search backend error at {url}: {reason}")]
    SearchBackend { url: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Document already added: {0}")]
    DuplicateAdd(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OaNlpError {
    /// True for malformed input, dimension mismatches included.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, OaNlpError::InvalidInput(_) | OaNlpError::DimensionMismatch { .. })
    }

    pub fn backend(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        OaNlpError::SearchBackend { url: url.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, OaNlpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_counts_as_invalid_input() {
        let err = OaNlpError::DimensionMismatch { expected: 3, actual: 2 };
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 2");
        assert!(!OaNlpError::NotFound("x".into()).is_invalid_input());
    }

    #[test]
    fn test_backend_error_carries_url() {
        let err = OaNlpError::backend("http://api.plos.org/search?q=x", "HTTP 500");
        match err {
            OaNlpError::SearchBackend { url, reason } => {
                assert!(url.starts_with("http://api.plos.org/search"));
                assert_eq!(reason, "HTTP 500");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
