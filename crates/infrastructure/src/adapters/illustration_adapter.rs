//! Illustration adapter - Implements IllustrationPort using ai_story

use ai_story::{GenerationError, ImageModelClient, StoryGenConfig};
use application::error::ApplicationError;
use application::ports::IllustrationPort;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Adapter for illustration generation using the ai_story crate
#[derive(Debug)]
pub struct IllustrationAdapter {
    client: ImageModelClient,
}

impl IllustrationAdapter {
    /// Create a new illustration adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the client fails to initialize.
    pub fn new(config: StoryGenConfig) -> Result<Self, ApplicationError> {
        let client = ImageModelClient::new(config).map_err(map_error)?;
        Ok(Self { client })
    }
}

/// Map a generation error to an application error
fn map_error(err: GenerationError) -> ApplicationError {
    match err {
        GenerationError::Configuration(e) => ApplicationError::Configuration(e),
        GenerationError::GenerationFailed(e) | GenerationError::ModelNotAvailable(e) => {
            ApplicationError::Generation(e)
        },
        GenerationError::RequestFailed(e) | GenerationError::ConnectionFailed(e) => {
            ApplicationError::ExternalService(e)
        },
        GenerationError::InvalidResponse(e) => ApplicationError::Internal(e),
        GenerationError::RateLimited => {
            ApplicationError::ExternalService("Rate limited by image API".to_string())
        },
        GenerationError::Timeout => {
            ApplicationError::ExternalService("Illustration request timed out".to_string())
        },
    }
}

#[async_trait]
impl IllustrationPort for IllustrationAdapter {
    #[instrument(skip(self))]
    async fn illustrate(&self, topic: &str) -> Result<String, ApplicationError> {
        let url = self.client.generate_image(topic).await.map_err(map_error)?;
        debug!("Illustration generation complete");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping_generation_failed() {
        let err = map_error(GenerationError::GenerationFailed("refused".to_string()));
        assert!(matches!(err, ApplicationError::Generation(_)));
    }

    #[test]
    fn error_mapping_invalid_response() {
        let err = map_error(GenerationError::InvalidResponse("no image".to_string()));
        assert!(matches!(err, ApplicationError::Internal(_)));
    }
}
