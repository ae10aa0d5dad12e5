//! Story entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::StoryId;

/// A generated children's story
///
/// Immutable once created, except for the like counter which only ever
/// increases. The word sequence is tokenized once at construction; punctuation
/// stays attached to the preceding token so "sat." is read as one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Unique story identifier
    pub id: StoryId,
    /// The topic the child asked for
    pub topic: String,
    /// Full story text
    pub content: String,
    /// Reference to the generated illustration, if one exists
    pub illustration: Option<String>,
    /// When the story was created
    pub created_at: DateTime<Utc>,
    words: Vec<String>,
    likes: u32,
}

impl Story {
    /// Create a new story, tokenizing the content into its word sequence
    pub fn new(topic: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let words = tokenize(&content);

        Self {
            id: StoryId::new(),
            topic: topic.into(),
            content,
            illustration: None,
            created_at: Utc::now(),
            words,
            likes: 0,
        }
    }

    /// Attach an illustration reference
    pub fn with_illustration(mut self, illustration: impl Into<String>) -> Self {
        self.illustration = Some(illustration.into());
        self
    }

    /// The ordered word sequence, punctuation retained
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words in the story
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Current like count
    pub const fn likes(&self) -> u32 {
        self.likes
    }

    /// Increment the like counter, returning the new count
    pub fn like(&mut self) -> u32 {
        self.likes = self.likes.saturating_add(1);
        self.likes
    }
}

/// Split story text into word tokens on whitespace, keeping punctuation
/// attached to the preceding token.
fn tokenize(content: &str) -> Vec<String> {
    content.split_whitespace().map(ToString::to_string).collect()
}
