//! Speech output port - the text-to-speech side of read-along playback

use async_trait::async_trait;
use domain::SpeechRate;
use thiserror::Error;

/// How an utterance finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// The utterance played to the end
    Ended,
    /// A newer `speak` or an explicit `cancel` superseded the utterance.
    /// Cancellation is not a failure and produces no further events.
    Cancelled,
}

/// Speech output failures, per the read-along error taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechOutputError {
    /// Synthesis capability is not usable; detected once at adapter
    /// construction, after which every `speak` fails fast
    #[error("speech output unavailable")]
    Unavailable,

    /// The engine failed mid-utterance
    #[error("synthesis failed: {0}")]
    Synthesis(String),
}

/// Port for speaking single words aloud
///
/// Implementations must guarantee that at most one utterance is audible at a
/// time: issuing a new `speak` while a previous one is in flight resolves the
/// previous call with [`SpeakOutcome::Cancelled`].
#[async_trait]
pub trait SpeechOutputPort: Send + Sync {
    /// Speak one word at the given rate, resolving when the utterance ends,
    /// is cancelled, or fails.
    async fn speak(&self, word: &str, rate: SpeechRate)
    -> Result<SpeakOutcome, SpeechOutputError>;

    /// Cancel any in-flight utterance. No-op when nothing is playing.
    async fn cancel(&self);

    /// Whether the underlying synthesis capability is usable
    fn is_available(&self) -> bool;
}
