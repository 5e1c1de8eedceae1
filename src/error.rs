//! Error types for dynexpr.
//!
//! The expression builders and table transformers never fail; these errors
//! belong to the layers around them (configuration, input decoding, CLI).

use thiserror::Error;

/// The main error type for dynexpr operations.
#[derive(Debug, Error)]
pub enum DynexprError {
    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input that cannot be turned into parameters or records.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML decoding error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DynexprError {
    /// Create an invalid input error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Result type alias for dynexpr operations.
pub type DynexprResult<T> = Result<T, DynexprError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DynexprError::invalid("expected a JSON object");
        assert_eq!(err.to_string(), "Invalid input: expected a JSON object");
    }

    #[test]
    fn test_json_error_converts() {
        let err: DynexprError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
