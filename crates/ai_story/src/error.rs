//! Generation error types

use thiserror::Error;

/// Errors from the generation clients
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend rejected or failed the generation request
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Could not reach the backend
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The backend returned something we could not parse
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limited by the backend
    #[error("Rate limited by generation API")]
    RateLimited,

    /// The configured model does not exist on the backend
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = GenerationError::GenerationFailed("model refused".to_string());
        assert_eq!(err.to_string(), "Generation failed: model refused");
    }

    #[test]
    fn rate_limited_message() {
        assert_eq!(
            GenerationError::RateLimited.to_string(),
            "Rate limited by generation API"
        );
    }
}
