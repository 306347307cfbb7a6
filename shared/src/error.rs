//! Error types for the reservation assistant.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving an assistant request.
#[derive(Error, Debug)]
pub enum Error {
    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Inbound event matched neither caller shape
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// Blob content was not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Short machine-friendly label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Aws(_) => "aws",
            Error::MalformedEvent(_) => "malformed_event",
            Error::Encoding(_) => "encoding",
            Error::Serialization(_) => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_errors_convert() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), "serialization");
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
