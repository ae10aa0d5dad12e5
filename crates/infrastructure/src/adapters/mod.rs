//! Adapters - port implementations over the AI crates

mod generation_adapter;
mod illustration_adapter;
mod speech_input_adapter;
mod speech_output_adapter;

pub use generation_adapter::StoryGenerationAdapter;
pub use illustration_adapter::IllustrationAdapter;
pub use speech_input_adapter::SpeechInputAdapter;
pub use speech_output_adapter::SpeechOutputAdapter;
