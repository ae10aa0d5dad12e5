//! Application services - Use case implementations

mod playback_registry;
mod read_along;
mod story_service;

pub use playback_registry::PlaybackRegistry;
pub use read_along::{PlaybackSnapshot, ReadAlongController};
pub use story_service::StoryService;
