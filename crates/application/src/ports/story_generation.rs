//! Story generation port - the language-model boundary

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// A story produced by the generation model
#[derive(Debug, Clone)]
pub struct GeneratedStory {
    /// The story text
    pub content: String,
    /// Model that produced it, for logging
    pub model: String,
}

/// Port for generating story text from a spoken topic
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StoryGenerationPort: Send + Sync {
    /// Generate a short children's story about the topic
    async fn generate(&self, topic: &str) -> Result<GeneratedStory, ApplicationError>;

    /// Check if the generation backend is reachable
    async fn is_available(&self) -> bool;
}
