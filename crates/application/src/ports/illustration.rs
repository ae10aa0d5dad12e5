//! Illustration port - the image-generation boundary

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for generating a story illustration
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IllustrationPort: Send + Sync {
    /// Generate an illustration for the topic, returning a reference
    /// (typically a URL) to the produced image
    async fn illustrate(&self, topic: &str) -> Result<String, ApplicationError>;
}
