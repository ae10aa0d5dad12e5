//! Speech input adapter - Implements SpeechInputPort using ai_speech
//!
//! Each listening session captures attempt audio from an [`AudioSource`],
//! transcribes it, and delivers transcript events over a stream. A stop flag
//! per session guarantees that no events are delivered after
//! `stop_listening`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ai_speech::{AudioSource, SpeechError, SpeechToText};
use application::ports::{
    ListenOptions, SpeechInputError, SpeechInputPort, TranscriptEvent, TranscriptStream,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, instrument, warn};

/// Buffered transcript events per session
const SESSION_BUFFER: usize = 8;

/// Adapter for speech input using the ai_speech crate
pub struct SpeechInputAdapter {
    stt: Arc<dyn SpeechToText>,
    source: Arc<dyn AudioSource>,
    available: bool,
    /// Stop flag of the currently active session, if any
    active: Mutex<Option<Arc<AtomicBool>>>,
}

impl fmt::Debug for SpeechInputAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechInputAdapter")
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

impl SpeechInputAdapter {
    /// Create an adapter, probing recognition and capture availability once
    ///
    /// Availability is fixed at construction: without a working recognizer
    /// and capture device, every `start_listening` fails fast with
    /// [`SpeechInputError::Unavailable`] and playback degrades to read-only.
    pub async fn connect(stt: Arc<dyn SpeechToText>, source: Arc<dyn AudioSource>) -> Self {
        let available = stt.is_available().await && source.is_available();
        Self::with_availability(stt, source, available)
    }

    /// Create an adapter with a known availability
    pub fn with_availability(
        stt: Arc<dyn SpeechToText>,
        source: Arc<dyn AudioSource>,
        available: bool,
    ) -> Self {
        Self {
            stt,
            source,
            available,
            active: Mutex::new(None),
        }
    }

    /// Stop the current session, if one is active
    fn retire_active(&self) -> Option<Arc<AtomicBool>> {
        self.active.lock().take()
    }

    async fn run_session(
        stt: Arc<dyn SpeechToText>,
        source: Arc<dyn AudioSource>,
        options: ListenOptions,
        stopped: Arc<AtomicBool>,
        events: mpsc::Sender<TranscriptEvent>,
    ) {
        loop {
            let captured = source.capture().await;
            if stopped.load(Ordering::SeqCst) {
                return;
            }

            let audio = match captured {
                Ok(audio) => audio,
                Err(err) => {
                    let _ = events.send(TranscriptEvent::Failed(map_error(err))).await;
                    return;
                },
            };

            match stt.transcribe(audio, &options.language).await {
                Ok(transcription) => {
                    if stopped.load(Ordering::SeqCst) {
                        return;
                    }
                    debug!(text_len = transcription.text.len(), "Attempt transcribed");
                    let event = TranscriptEvent::Transcript {
                        text: transcription.text,
                        is_final: true,
                    };
                    if events.send(event).await.is_err() {
                        return;
                    }
                },
                Err(err) => {
                    if stopped.load(Ordering::SeqCst) {
                        return;
                    }
                    warn!(error = %err, "Transcription failed");
                    let _ = events.send(TranscriptEvent::Failed(map_error(err))).await;
                    return;
                },
            }

            if !options.continuous {
                if !stopped.load(Ordering::SeqCst) {
                    let _ = events.send(TranscriptEvent::Ended).await;
                }
                return;
            }
        }
    }
}

/// Map a speech error to the input error taxonomy
fn map_error(err: SpeechError) -> SpeechInputError {
    match err {
        SpeechError::NoSpeechDetected => SpeechInputError::NoSpeech,
        SpeechError::PermissionDenied => SpeechInputError::PermissionDenied,
        SpeechError::NotAvailable(_) => SpeechInputError::Unavailable,
        other => SpeechInputError::Recognition(other.to_string()),
    }
}

#[async_trait]
impl SpeechInputPort for SpeechInputAdapter {
    #[instrument(skip(self, options), fields(language = %options.language))]
    async fn start_listening(
        &self,
        options: &ListenOptions,
    ) -> Result<TranscriptStream, SpeechInputError> {
        if !self.available {
            return Err(SpeechInputError::Unavailable);
        }

        // One listening session at a time: retire any previous one first
        if let Some(previous) = self.retire_active() {
            previous.store(true, Ordering::SeqCst);
            self.source.stop().await;
        }

        let stopped = Arc::new(AtomicBool::new(false));
        *self.active.lock() = Some(Arc::clone(&stopped));

        let (sender, receiver) = mpsc::channel(SESSION_BUFFER);
        tokio::spawn(Self::run_session(
            Arc::clone(&self.stt),
            Arc::clone(&self.source),
            options.clone(),
            stopped,
            sender,
        ));

        Ok(Box::pin(ReceiverStream::new(receiver)))
    }

    async fn stop_listening(&self) {
        if let Some(stopped) = self.retire_active() {
            stopped.store(true, Ordering::SeqCst);
            self.source.stop().await;
        }
    }

    fn is_available(&self) -> bool {
        self.available
    }
}
