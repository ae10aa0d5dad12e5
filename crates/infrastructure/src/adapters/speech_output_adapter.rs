//! Speech output adapter - Implements SpeechOutputPort using ai_speech
//!
//! Synthesizes one word at a time and plays it through an audio sink. A
//! generation counter implements cancellation: every new `speak` or explicit
//! `cancel` bumps the counter, and an in-flight utterance that observes a
//! bump resolves with [`SpeakOutcome::Cancelled`] instead of finishing.

use std::fmt;
use std::sync::Arc;

use ai_speech::{AudioSink, SpeechError, TextToSpeech};
use application::ports::{SpeakOutcome, SpeechOutputError, SpeechOutputPort};
use async_trait::async_trait;
use domain::SpeechRate;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Adapter for speech output using the ai_speech crate
pub struct SpeechOutputAdapter {
    tts: Arc<dyn TextToSpeech>,
    sink: Arc<dyn AudioSink>,
    generation: watch::Sender<u64>,
    available: bool,
}

impl fmt::Debug for SpeechOutputAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechOutputAdapter")
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

impl SpeechOutputAdapter {
    /// Create an adapter, probing synthesis and sink availability once
    ///
    /// Availability is fixed at construction: if either side is missing,
    /// every subsequent `speak` fails fast with
    /// [`SpeechOutputError::Unavailable`].
    pub async fn connect(tts: Arc<dyn TextToSpeech>, sink: Arc<dyn AudioSink>) -> Self {
        let available = tts.is_available().await && sink.is_available();
        Self::with_availability(tts, sink, available)
    }

    /// Create an adapter with a known availability
    pub fn with_availability(
        tts: Arc<dyn TextToSpeech>,
        sink: Arc<dyn AudioSink>,
        available: bool,
    ) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            tts,
            sink,
            generation,
            available,
        }
    }
}

/// Map a speech error to the output error taxonomy
fn map_error(err: SpeechError) -> SpeechOutputError {
    match err {
        SpeechError::NotAvailable(_) => SpeechOutputError::Unavailable,
        other => SpeechOutputError::Synthesis(other.to_string()),
    }
}

#[async_trait]
impl SpeechOutputPort for SpeechOutputAdapter {
    #[instrument(skip(self), fields(word, rate = %rate))]
    async fn speak(
        &self,
        word: &str,
        rate: SpeechRate,
    ) -> Result<SpeakOutcome, SpeechOutputError> {
        if !self.available {
            return Err(SpeechOutputError::Unavailable);
        }

        // Supersede any in-flight utterance, then watch for being
        // superseded ourselves
        self.generation.send_modify(|g| *g = g.wrapping_add(1));
        let mut superseded = self.generation.subscribe();

        let utterance = async {
            let audio = self.tts.synthesize(word, rate.value()).await?;
            debug!(audio_size = audio.size_bytes(), "Playing utterance");
            self.sink.play(&audio).await?;
            Ok::<(), SpeechError>(())
        };

        tokio::select! {
            result = utterance => match result {
                Ok(()) => Ok(SpeakOutcome::Ended),
                Err(err) => Err(map_error(err)),
            },
            _ = superseded.changed() => Ok(SpeakOutcome::Cancelled),
        }
    }

    async fn cancel(&self) {
        self.generation.send_modify(|g| *g = g.wrapping_add(1));
    }

    fn is_available(&self) -> bool {
        self.available
    }
}
