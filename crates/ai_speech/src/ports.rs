//! Speech processing traits (ports)

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, Transcription};

/// Text-to-speech synthesis
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize speech from text at the given speed multiplier
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails.
    async fn synthesize(&self, text: &str, speed: f32) -> Result<AudioData, SpeechError>;

    /// Check if the service is available
    async fn is_available(&self) -> bool;

    /// Get the voice in use
    fn voice(&self) -> &str;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Speech-to-text transcription
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio to text with a language hint
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if transcription fails.
    async fn transcribe(
        &self,
        audio: AudioData,
        language: &str,
    ) -> Result<Transcription, SpeechError>;

    /// Check if the service is available
    async fn is_available(&self) -> bool;

    /// Get the model name
    fn model_name(&self) -> &str;
}
