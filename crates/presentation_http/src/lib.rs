//! StoryNest HTTP API
//!
//! REST surface over the story library and read-along playback sessions:
//! - `/v1/stories`: create, list, fetch, and like stories
//! - `/v1/playback`: open and drive read-along sessions, with a server-sent
//!   events stream for playback signals
//! - `/v1/speech/synthesize`: proxy to the TTS provider for clients that
//!   play audio themselves

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
