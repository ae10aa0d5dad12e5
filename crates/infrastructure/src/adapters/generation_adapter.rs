//! Story generation adapter - Implements StoryGenerationPort using ai_story

use ai_story::{GenerationError, StoryGenConfig, StoryModelClient};
use application::error::ApplicationError;
use application::ports::{GeneratedStory, StoryGenerationPort};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Adapter for story text generation using the ai_story crate
#[derive(Debug)]
pub struct StoryGenerationAdapter {
    client: StoryModelClient,
}

impl StoryGenerationAdapter {
    /// Create a new story generation adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the client fails to initialize.
    pub fn new(config: StoryGenConfig) -> Result<Self, ApplicationError> {
        let client = StoryModelClient::new(config).map_err(map_error)?;
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
            ApplicationError::ExternalService("Rate limited by generation API".to_string())
        },
        GenerationError::Timeout => {
            ApplicationError::ExternalService("Generation request timed out".to_string())
        },
    }
}

#[async_trait]
impl StoryGenerationPort for StoryGenerationAdapter {
    #[instrument(skip(self))]
    async fn generate(&self, topic: &str) -> Result<GeneratedStory, ApplicationError> {
        let completion = self.client.generate_story(topic).await.map_err(map_error)?;

        debug!(
            content_len = completion.content.len(),
            model = %completion.model,
            "Story generation complete"
        );

        Ok(GeneratedStory {
            content: completion.content,
            model: completion.model,
        })
    }

    async fn is_available(&self) -> bool {
        self.client.is_available().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping_configuration() {
        let err = map_error(GenerationError::Configuration("bad config".to_string()));
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[test]
    fn error_mapping_generation_failed() {
        let err = map_error(GenerationError::GenerationFailed("refused".to_string()));
        assert!(matches!(err, ApplicationError::Generation(_)));
    }

    #[test]
    fn error_mapping_connection() {
        let err = map_error(GenerationError::ConnectionFailed("unreachable".to_string()));
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }

    #[test]
    fn error_mapping_rate_limited() {
        let err = map_error(GenerationError::RateLimited);
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }

    #[test]
    fn error_mapping_timeout() {
        let err = map_error(GenerationError::Timeout);
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }
}
