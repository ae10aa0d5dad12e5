//! Value objects for the StoryNest domain

mod session_id;
mod speech_rate;
mod story_id;

pub use session_id::SessionId;
pub use speech_rate::SpeechRate;
pub use story_id::StoryId;
