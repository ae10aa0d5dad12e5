//! In-memory story store
//!
//! Stories live for the lifetime of the process. Durability is out of scope;
//! this map is the system of record.

use std::collections::HashMap;

use application::error::ApplicationError;
use application::ports::StoryStorePort;
use async_trait::async_trait;
use domain::{DomainError, Story, StoryId};
use parking_lot::RwLock;
use tracing::debug;

/// Story store backed by an in-process map
#[derive(Debug, Default)]
pub struct InMemoryStoryStore {
    stories: RwLock<HashMap<StoryId, Story>>,
}

impl InMemoryStoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored stories
    pub fn len(&self) -> usize {
        self.stories.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.stories.read().is_empty()
    }
}

#[async_trait]
impl StoryStorePort for InMemoryStoryStore {
    async fn insert(&self, story: Story) -> Result<(), ApplicationError> {
        debug!(story_id = %story.id, "Storing story");
        self.stories.write().insert(story.id, story);
        Ok(())
    }

    async fn get(&self, id: StoryId) -> Result<Story, ApplicationError> {
        self.stories
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Story", id.to_string()).into())
    }

    async fn list(&self) -> Result<Vec<Story>, ApplicationError> {
        let mut stories: Vec<Story> = self.stories.read().values().cloned().collect();
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stories)
    }

    async fn like(&self, id: StoryId) -> Result<u32, ApplicationError> {
        let mut stories = self.stories.write();
        let story = stories
            .get_mut(&id)
            .ok_or_else(|| ApplicationError::from(DomainError::not_found("Story", id.to_string())))?;
        Ok(story.like())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = InMemoryStoryStore::new();
        let story = Story::new("cats", "The cat sat.");
        let id = story.id;

        store.insert(story.clone()).await.unwrap();

        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched, story);
    }

    #[tokio::test]
    async fn get_unknown_story_is_not_found() {
        let store = InMemoryStoryStore::new();

        let result = store.get(StoryId::new()).await;

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = InMemoryStoryStore::new();
        let older = Story::new("cats", "The cat sat.");
        let mut newer = Story::new("dogs", "A dog ran.");
        newer.created_at = older.created_at + chrono::Duration::seconds(1);

        store.insert(older.clone()).await.unwrap();
        store.insert(newer.clone()).await.unwrap();

        let stories = store.list().await.unwrap();
        assert_eq!(stories[0].id, newer.id);
        assert_eq!(stories[1].id, older.id);
    }

    #[tokio::test]
    async fn like_increments_and_persists() {
        let store = InMemoryStoryStore::new();
        let story = Story::new("cats", "The cat sat.");
        let id = story.id;
        store.insert(story).await.unwrap();

        assert_eq!(store.like(id).await.unwrap(), 1);
        assert_eq!(store.like(id).await.unwrap(), 2);
        assert_eq!(store.get(id).await.unwrap().likes(), 2);
    }

    #[tokio::test]
    async fn like_unknown_story_is_not_found() {
        let store = InMemoryStoryStore::new();

        let result = store.like(StoryId::new()).await;

        assert!(result.is_err());
    }
}
