//! Story and illustration generation clients
//!
//! HTTP clients for OpenAI-compatible APIs: chat completions for story text
//! and image generations for illustrations. This crate knows nothing about
//! the rest of the system; the infrastructure layer adapts these clients to
//! the application ports.

pub mod config;
pub mod error;
pub mod illustration;
pub mod story;

pub use config::StoryGenConfig;
pub use error::GenerationError;
pub use illustration::ImageModelClient;
pub use story::{StoryCompletion, StoryModelClient};
