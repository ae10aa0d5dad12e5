//! Domain layer for StoryNest
//!
//! Contains core business logic: the story entity, the word matcher, and the
//! read-along playback state machine. This layer has no I/O dependencies and
//! defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod matcher;
pub mod read_along;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
