//! Story service - generation and library management

use std::{fmt, sync::Arc};

use domain::{DomainError, Story, StoryId};
use tracing::{info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{IllustrationPort, StoryGenerationPort, StoryStorePort},
};

/// Service for creating and browsing stories
pub struct StoryService {
    generator: Arc<dyn StoryGenerationPort>,
    illustrator: Option<Arc<dyn IllustrationPort>>,
    store: Arc<dyn StoryStorePort>,
}

impl fmt::Debug for StoryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryService")
            .field("illustrator", &self.illustrator.is_some())
            .finish_non_exhaustive()
    }
}

impl StoryService {
    /// Create a new story service
    pub fn new(
        generator: Arc<dyn StoryGenerationPort>,
        illustrator: Option<Arc<dyn IllustrationPort>>,
        store: Arc<dyn StoryStorePort>,
    ) -> Self {
        Self {
            generator,
            illustrator,
            store,
        }
    }

    /// Generate, illustrate, and persist a story about a topic
    ///
    /// Illustration is best-effort: a failed image generation is logged and
    /// the story is returned without one.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank topic, or a generation error
    /// when the language model fails.
    #[instrument(skip(self))]
    pub async fn create_story(&self, topic: &str) -> Result<Story, ApplicationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DomainError::ValidationError("topic must not be empty".to_string()).into());
        }

        let generated = self.generator.generate(topic).await?;
        info!(model = %generated.model, "Story generated");

        let mut story = Story::new(topic, generated.content);

        if let Some(illustrator) = &self.illustrator {
            match illustrator.illustrate(topic).await {
                Ok(illustration) => story = story.with_illustration(illustration),
                Err(err) => warn!(error = %err, "Illustration failed, continuing without one"),
            }
        }

        self.store.insert(story.clone()).await?;
        info!(story_id = %story.id, words = story.word_count(), "Story created");
        Ok(story)
    }

    /// Fetch a story by ID
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` when no story has this ID.
    pub async fn get_story(&self, id: StoryId) -> Result<Story, ApplicationError> {
        self.store.get(id).await
    }

    /// List all stories, newest first
    pub async fn list_stories(&self) -> Result<Vec<Story>, ApplicationError> {
        self.store.list().await
    }

    /// Like a story, returning the new like count
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` when no story has this ID.
    #[instrument(skip(self))]
    pub async fn like_story(&self, id: StoryId) -> Result<u32, ApplicationError> {
        self.store.like(id).await
    }

    /// Check whether the generation backend is reachable
    pub async fn is_healthy(&self) -> bool {
        self.generator.is_available().await
    }
}
