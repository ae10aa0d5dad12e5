//! Port definitions for the application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external capabilities. Adapters in the infrastructure layer implement
//! these ports.

mod illustration;
mod speech_input;
mod speech_output;
mod story_generation;
mod story_store;

#[cfg(test)]
pub use illustration::MockIllustrationPort;
pub use illustration::IllustrationPort;
pub use speech_input::{
    ListenOptions, SpeechInputError, SpeechInputPort, TranscriptEvent, TranscriptStream,
};
pub use speech_output::{SpeakOutcome, SpeechOutputError, SpeechOutputPort};
#[cfg(test)]
pub use story_generation::MockStoryGenerationPort;
pub use story_generation::{GeneratedStory, StoryGenerationPort};
#[cfg(test)]
pub use story_store::MockStoryStorePort;
pub use story_store::StoryStorePort;
