//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Story generation failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Entity or session not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Generation(_) | Self::ExternalService(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_is_transparent() {
        let err: ApplicationError = DomainError::not_found("Story", "x").into();
        assert_eq!(err.to_string(), "Story not found: x");
    }

    #[test]
    fn external_service_error_is_retryable() {
        assert!(ApplicationError::ExternalService("down".to_string()).is_retryable());
    }

    #[test]
    fn not_found_is_not_retryable() {
        assert!(!ApplicationError::NotFound("story".to_string()).is_retryable());
    }
}
