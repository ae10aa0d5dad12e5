//! Infrastructure - Adapters, configuration, and persistence
//!
//! Bridges the application ports to the AI crates and in-memory storage:
//! - `adapters`: port implementations over `ai_story` and `ai_speech`
//! - `config`: application configuration loading
//! - `persistence`: the in-memory story store

pub mod adapters;
pub mod config;
pub mod persistence;

pub use adapters::{
    IllustrationAdapter, SpeechInputAdapter, SpeechOutputAdapter, StoryGenerationAdapter,
};
pub use config::{AppConfig, PlaybackConfig, ServerConfig};
pub use persistence::InMemoryStoryStore;
