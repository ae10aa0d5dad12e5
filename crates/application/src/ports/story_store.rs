//! Story store port - persistence boundary for generated stories

use async_trait::async_trait;
use domain::{Story, StoryId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for story persistence
///
/// The reference implementation is an in-memory map; durability is
/// explicitly out of scope.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StoryStorePort: Send + Sync {
    /// Persist a new story
    async fn insert(&self, story: Story) -> Result<(), ApplicationError>;

    /// Fetch a story by ID
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if no story has this ID.
    async fn get(&self, id: StoryId) -> Result<Story, ApplicationError>;

    /// List all stories, newest first
    async fn list(&self) -> Result<Vec<Story>, ApplicationError>;

    /// Increment a story's like counter, returning the new count
    async fn like(&self, id: StoryId) -> Result<u32, ApplicationError>;
}
