//! Read-along controller
//!
//! Drives the pure playback state machine through the two speech ports. The
//! controller is driven entirely by adapter completions: it issues a request,
//! suspends, and feeds the completion back into the machine as an event. No
//! locks are held across await points and no two adapter operations of the
//! same kind are ever outstanding at once.
//!
//! A session epoch guards against stale completions: pause and restart bump
//! the epoch, so a speak or listen task belonging to a superseded session can
//! never feed events into the new one.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use domain::{
    SpeechRate, Story,
    read_along::{
        ListenFailure, Phase, PlaybackCommand, PlaybackEvent, PlaybackSignal, PlaybackState, Step,
    },
};
use futures::{
    StreamExt,
    future::{BoxFuture, FutureExt},
};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use crate::ports::{
    ListenOptions, SpeakOutcome, SpeechInputError, SpeechInputPort, SpeechOutputPort,
    TranscriptEvent,
};

/// Capacity of the signal broadcast channel; signals are advisory
/// notifications, a slow subscriber may miss some.
const SIGNAL_BUFFER: usize = 64;

/// A read-only view of the playback session for status endpoints
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSnapshot {
    /// Current playback phase
    pub phase: Phase,
    /// Current word index
    pub word_index: usize,
    /// The word currently being worked on
    pub current_word: Option<String>,
    /// Speech rate multiplier
    pub rate: f32,
    /// Whether microphone access has been confirmed
    pub microphone_granted: bool,
}

/// Controller for one read-along playback session
///
/// Cheap to clone; all clones share the same session.
#[derive(Clone)]
pub struct ReadAlongController {
    inner: Arc<Inner>,
}

struct Inner {
    story: Arc<Story>,
    output: Arc<dyn SpeechOutputPort>,
    input: Arc<dyn SpeechInputPort>,
    listen_options: ListenOptions,
    state: Mutex<PlaybackState>,
    epoch: AtomicU64,
    signals: broadcast::Sender<PlaybackSignal>,
}

impl fmt::Debug for ReadAlongController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadAlongController")
            .field("story", &self.inner.story.id)
            .field("state", &*self.inner.state.lock())
            .finish_non_exhaustive()
    }
}

impl ReadAlongController {
    /// Create a controller for a story
    pub fn new(
        story: Arc<Story>,
        output: Arc<dyn SpeechOutputPort>,
        input: Arc<dyn SpeechInputPort>,
        listen_options: ListenOptions,
    ) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_BUFFER);

        Self {
            inner: Arc::new(Inner {
                story,
                output,
                input,
                listen_options,
                state: Mutex::new(PlaybackState::new()),
                epoch: AtomicU64::new(0),
                signals,
            }),
        }
    }

    /// Subscribe to playback signals (word advanced, completed, faults)
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackSignal> {
        self.inner.signals.subscribe()
    }

    /// The story this session is reading
    pub fn story(&self) -> &Story {
        &self.inner.story
    }

    /// Current session snapshot
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let state = self.inner.state.lock();
        PlaybackSnapshot {
            phase: state.phase(),
            word_index: state.word_index(),
            current_word: self
                .inner
                .story
                .words()
                .get(state.word_index())
                .cloned(),
            rate: state.rate().value(),
            microphone_granted: state.microphone_granted(),
        }
    }

    /// Confirm microphone access, enabling listening transitions
    pub fn grant_microphone(&self) {
        let _ = self.apply(PlaybackEvent::MicrophoneGranted);
    }

    /// Adjust the speech rate for subsequent utterances
    pub fn set_rate(&self, rate: SpeechRate) {
        let _ = self.apply(PlaybackEvent::SetRate(rate));
    }

    /// Start or resume playback from the current word
    #[instrument(skip(self), fields(story_id = %self.inner.story.id))]
    pub async fn start(&self) {
        let epoch = self.inner.epoch.load(Ordering::SeqCst);
        self.step(epoch, PlaybackEvent::Start).await;
    }

    /// Pause playback, cancelling any in-flight adapter operation
    #[instrument(skip(self), fields(story_id = %self.inner.story.id))]
    pub async fn pause(&self) {
        let epoch = self.bump_epoch();
        self.step(epoch, PlaybackEvent::Pause).await;
    }

    /// Restart from the first word, cancelling speech and stopping listening
    #[instrument(skip(self), fields(story_id = %self.inner.story.id))]
    pub async fn restart(&self) {
        let epoch = self.bump_epoch();
        self.step(epoch, PlaybackEvent::Restart).await;
    }

    /// Invalidate any in-flight adapter completions
    fn bump_epoch(&self) -> u64 {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn apply(&self, event: PlaybackEvent) -> Step {
        self.inner
            .state
            .lock()
            .apply(event, self.inner.story.words())
    }

    /// Apply an event and carry out the commands it produced
    ///
    /// Boxed because the spawned drive tasks await `step` again; boxing keeps
    /// the future type finite.
    fn step(&self, epoch: u64, event: PlaybackEvent) -> BoxFuture<'_, ()> {
        async move {
            let step = self.apply(event);

            for signal in step.signals {
                debug!(?signal, "Playback signal");
                let _ = self.inner.signals.send(signal);
            }

            for command in step.commands {
                match command {
                    PlaybackCommand::CancelSpeech => self.inner.output.cancel().await,
                    PlaybackCommand::StopListening => self.inner.input.stop_listening().await,
                    PlaybackCommand::Speak { index } => {
                        let this = self.clone();
                        tokio::spawn(async move { this.drive_speak(epoch, index).await });
                    },
                    PlaybackCommand::StartListening => {
                        let this = self.clone();
                        tokio::spawn(async move { this.drive_listen(epoch).await });
                    },
                }
            }
        }
        .boxed()
    }

    /// Apply an event unless the session it belongs to has been superseded
    async fn step_if_current(&self, epoch: u64, event: PlaybackEvent) {
        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            return;
        }
        self.step(epoch, event).await;
    }

    /// Speak one word and feed the completion back as an event
    async fn drive_speak(self, epoch: u64, index: usize) {
        let Some(word) = self.inner.story.words().get(index).cloned() else {
            return;
        };

        self.step_if_current(epoch, PlaybackEvent::SpeechStarted)
            .await;

        // Pause or restart may have superseded this session while the task
        // was queued; a stale utterance must never reach the speakers.
        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            return;
        }

        let rate = self.inner.state.lock().rate();
        match self.inner.output.speak(&word, rate).await {
            Ok(SpeakOutcome::Ended) => {
                self.step_if_current(epoch, PlaybackEvent::SpeechEnded)
                    .await;
            },
            // A cancelled utterance emits no further events
            Ok(SpeakOutcome::Cancelled) => {},
            Err(err) => {
                self.step_if_current(epoch, PlaybackEvent::SpeechFailed(err.to_string()))
                    .await;
            },
        }
    }

    /// Run one listening session, feeding transcript events into the machine
    async fn drive_listen(self, epoch: u64) {
        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            return;
        }

        let mut stream = match self
            .inner
            .input
            .start_listening(&self.inner.listen_options)
            .await
        {
            Ok(stream) => stream,
            Err(err) => {
                self.step_if_current(epoch, PlaybackEvent::ListeningFailed(listen_failure(err)))
                    .await;
                return;
            },
        };

        while let Some(event) = stream.next().await {
            if self.inner.epoch.load(Ordering::SeqCst) != epoch {
                return;
            }

            match event {
                TranscriptEvent::Transcript { text, .. } => {
                    self.step(epoch, PlaybackEvent::TranscriptReceived(text))
                        .await;
                    // A match or retry moved the machine on; stop consuming
                    if self.inner.state.lock().phase() != Phase::Listening {
                        return;
                    }
                },
                TranscriptEvent::Ended => {
                    self.step(epoch, PlaybackEvent::ListeningEnded).await;
                    return;
                },
                TranscriptEvent::Failed(err) => {
                    self.step(epoch, PlaybackEvent::ListeningFailed(listen_failure(err)))
                        .await;
                    return;
                },
            }
        }

        // Stream ended without an explicit terminator
        self.step_if_current(epoch, PlaybackEvent::ListeningEnded)
            .await;
    }
}

fn listen_failure(err: SpeechInputError) -> ListenFailure {
    match err {
        SpeechInputError::Unavailable => ListenFailure::Unavailable,
        SpeechInputError::PermissionDenied => ListenFailure::PermissionDenied,
        SpeechInputError::NoSpeech => ListenFailure::NoSpeech,
        SpeechInputError::Recognition(msg) => ListenFailure::Recognition(msg),
    }
}
