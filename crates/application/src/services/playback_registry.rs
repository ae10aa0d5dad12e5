//! Playback session registry
//!
//! Owns the live read-along sessions and the shared speech ports they run on.
//! Sessions are keyed by `SessionId`; closing a session resets it first so any
//! in-flight utterance or listening session is torn down before the handle is
//! dropped.

use std::{collections::HashMap, fmt, sync::Arc};

use domain::{SessionId, Story};
use parking_lot::RwLock;
use tracing::{info, instrument};

use crate::{
    error::ApplicationError,
    ports::{ListenOptions, SpeechInputPort, SpeechOutputPort},
    services::ReadAlongController,
};

/// Registry of active read-along sessions
pub struct PlaybackRegistry {
    output: Arc<dyn SpeechOutputPort>,
    input: Arc<dyn SpeechInputPort>,
    listen_options: ListenOptions,
    sessions: RwLock<HashMap<SessionId, ReadAlongController>>,
}

impl fmt::Debug for PlaybackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackRegistry")
            .field("sessions", &self.sessions.read().len())
            .finish_non_exhaustive()
    }
}

impl PlaybackRegistry {
    /// Create a registry over the given speech ports
    pub fn new(
        output: Arc<dyn SpeechOutputPort>,
        input: Arc<dyn SpeechInputPort>,
        listen_options: ListenOptions,
    ) -> Self {
        Self {
            output,
            input,
            listen_options,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a new playback session for a story
    #[instrument(skip(self, story), fields(story_id = %story.id))]
    pub fn open(&self, story: Arc<Story>) -> SessionId {
        let session_id = SessionId::new();
        let controller = ReadAlongController::new(
            story,
            Arc::clone(&self.output),
            Arc::clone(&self.input),
            self.listen_options.clone(),
        );

        self.sessions.write().insert(session_id, controller);
        info!(%session_id, "Opened playback session");
        session_id
    }

    /// Look up a session's controller
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` when no session has this ID.
    pub fn get(&self, session_id: SessionId) -> Result<ReadAlongController, ApplicationError> {
        self.sessions
            .read()
            .get(&session_id)
            .cloned()
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("playback session {session_id} not found"))
            })
    }

    /// Close a session, cancelling anything it has in flight
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` when no session has this ID.
    #[instrument(skip(self))]
    pub async fn close(&self, session_id: SessionId) -> Result<(), ApplicationError> {
        let controller = self.sessions.write().remove(&session_id).ok_or_else(|| {
            ApplicationError::NotFound(format!("playback session {session_id} not found"))
        })?;

        // Restart tears down any in-flight speech before the handle drops
        controller.restart().await;
        info!(%session_id, "Closed playback session");
        Ok(())
    }

    /// Number of currently open sessions
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use domain::SpeechRate;

    use super::*;
    use crate::ports::{
        SpeakOutcome, SpeechInputError, SpeechOutputError, TranscriptEvent, TranscriptStream,
    };

    struct NullOutput {
        cancels: AtomicUsize,
    }

    #[async_trait]
    impl SpeechOutputPort for NullOutput {
        async fn speak(
            &self,
            _word: &str,
            _rate: SpeechRate,
        ) -> Result<SpeakOutcome, SpeechOutputError> {
            Ok(SpeakOutcome::Ended)
        }

        async fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    struct NullInput;

    #[async_trait]
    impl SpeechInputPort for NullInput {
        async fn start_listening(
            &self,
            _options: &ListenOptions,
        ) -> Result<TranscriptStream, SpeechInputError> {
            Ok(Box::pin(futures::stream::iter(vec![
                TranscriptEvent::Ended,
            ])))
        }

        async fn stop_listening(&self) {}

        fn is_available(&self) -> bool {
            true
        }
    }

    fn registry() -> (PlaybackRegistry, Arc<NullOutput>) {
        let output = Arc::new(NullOutput {
            cancels: AtomicUsize::new(0),
        });
        let registry = PlaybackRegistry::new(
            Arc::clone(&output) as Arc<dyn SpeechOutputPort>,
            Arc::new(NullInput),
            ListenOptions::default(),
        );
        (registry, output)
    }

    fn story() -> Arc<Story> {
        Arc::new(Story::new("cats", "The cat sat."))
    }

    #[tokio::test]
    async fn open_then_get_returns_the_session() {
        let (registry, _) = registry();

        let session_id = registry.open(story());

        let controller = registry.get(session_id).expect("session should exist");
        assert_eq!(controller.story().topic, "cats");
        assert_eq!(registry.session_count(), 1);
    }

    #[tokio::test]
    async fn get_unknown_session_is_not_found() {
        let (registry, _) = registry();

        let result = registry.get(SessionId::new());

        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn close_removes_the_session_and_cancels_speech() {
        let (registry, output) = registry();
        let session_id = registry.open(story());

        registry.close(session_id).await.expect("close should succeed");

        assert_eq!(registry.session_count(), 0);
        assert!(registry.get(session_id).is_err());
        assert!(output.cancels.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn close_unknown_session_is_not_found() {
        let (registry, _) = registry();

        let result = registry.close(SessionId::new()).await;

        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let (registry, _) = registry();
        let first = registry.open(story());
        let second = registry.open(Arc::new(Story::new("dogs", "A dog ran.")));

        registry.close(first).await.expect("close should succeed");

        assert!(registry.get(first).is_err());
        assert!(registry.get(second).is_ok());
    }
}
