//! Speech input port - the recognition side of read-along playback

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use thiserror::Error;

/// Recognition session configuration
#[derive(Debug, Clone)]
pub struct ListenOptions {
    /// BCP 47 language tag, e.g. "en-US"
    pub language: String,
    /// Keep listening after the first final transcript
    pub continuous: bool,
    /// Emit unstable partial transcripts before finalization
    pub interim_results: bool,
}

impl Default for ListenOptions {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: false,
            interim_results: true,
        }
    }
}

/// Speech input failures, per the read-along error taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechInputError {
    /// Recognition capability is not usable on this platform
    #[error("speech recognition unavailable")]
    Unavailable,

    /// The user declined microphone access; not recoverable without
    /// user action
    #[error("microphone permission denied")]
    PermissionDenied,

    /// The recognizer timed out without hearing speech; recoverable
    #[error("no speech detected")]
    NoSpeech,

    /// Any other engine-reported error
    #[error("recognition failed: {0}")]
    Recognition(String),
}

/// One event in a listening session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// A transcript update; `is_final` is false for interim results
    Transcript { text: String, is_final: bool },
    /// The session ended normally
    Ended,
    /// The session ended with an error
    Failed(SpeechInputError),
}

/// Stream of transcript events, terminated by `Ended` or `Failed`
pub type TranscriptStream = Pin<Box<dyn Stream<Item = TranscriptEvent> + Send>>;

/// Port for listening to the child's spoken attempt
///
/// Implementations must guarantee that no transcript events are delivered for
/// a session after `stop_listening` has been called for it.
#[async_trait]
pub trait SpeechInputPort: Send + Sync {
    /// Begin a listening session
    ///
    /// # Errors
    ///
    /// Fails immediately with [`SpeechInputError::Unavailable`] when the
    /// capability was missing at construction, or
    /// [`SpeechInputError::PermissionDenied`] when microphone access is
    /// blocked.
    async fn start_listening(
        &self,
        options: &ListenOptions,
    ) -> Result<TranscriptStream, SpeechInputError>;

    /// Stop the active listening session. Idempotent: a no-op when no
    /// session is active.
    async fn stop_listening(&self);

    /// Whether the underlying recognition capability is usable
    fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_options_default_to_single_locale() {
        let options = ListenOptions::default();
        assert_eq!(options.language, "en-US");
        assert!(!options.continuous);
        assert!(options.interim_results);
    }

    #[test]
    fn no_speech_error_message() {
        assert_eq!(SpeechInputError::NoSpeech.to_string(), "no speech detected");
    }

    #[test]
    fn permission_denied_error_message() {
        assert_eq!(
            SpeechInputError::PermissionDenied.to_string(),
            "microphone permission denied"
        );
    }
}
