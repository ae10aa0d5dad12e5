//! Audio device boundaries
//!
//! Where synthesized audio goes ([`AudioSink`]) and where captured attempts
//! come from ([`AudioSource`]). The in-memory implementations here back
//! headless deployments and tests; a real capture device plugs in behind the
//! same traits.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::SpeechError;
use crate::types::AudioData;

/// Destination for synthesized audio
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Play one audio clip to completion
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if playback fails.
    async fn play(&self, audio: &AudioData) -> Result<(), SpeechError>;

    /// Check if the sink can play audio
    fn is_available(&self) -> bool;
}

/// Source of captured attempt audio
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Capture one utterance, resolving when the speaker stops
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::NoSpeechDetected`] when the capture window
    /// closes without hearing anything, or [`SpeechError::PermissionDenied`]
    /// when microphone access is blocked.
    async fn capture(&self) -> Result<AudioData, SpeechError>;

    /// Abort an in-progress capture. Idempotent.
    async fn stop(&self);

    /// Check if the source can capture audio
    fn is_available(&self) -> bool;
}

/// Sink that records played clips instead of producing sound
#[derive(Debug, Default)]
pub struct MemorySink {
    played: Mutex<Vec<AudioData>>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clips played so far, in order
    pub fn played(&self) -> Vec<AudioData> {
        self.played.lock().clone()
    }

    /// Number of clips played
    pub fn play_count(&self) -> usize {
        self.played.lock().len()
    }
}

#[async_trait]
impl AudioSink for MemorySink {
    async fn play(&self, audio: &AudioData) -> Result<(), SpeechError> {
        self.played.lock().push(audio.clone());
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Sink that accepts and discards audio
///
/// Used on headless servers where clients fetch synthesized audio over HTTP
/// instead of it being played locally.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl AudioSink for NullSink {
    async fn play(&self, _audio: &AudioData) -> Result<(), SpeechError> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Source replaying a scripted queue of clips, one per capture
#[derive(Debug, Default)]
pub struct QueueSource {
    clips: Mutex<VecDeque<AudioData>>,
}

impl QueueSource {
    /// Create a source that replays the given clips in order
    #[must_use]
    pub fn new(clips: impl IntoIterator<Item = AudioData>) -> Self {
        Self {
            clips: Mutex::new(clips.into_iter().collect()),
        }
    }

    /// Append a clip to the queue
    pub fn push(&self, clip: AudioData) {
        self.clips.lock().push_back(clip);
    }
}

#[async_trait]
impl AudioSource for QueueSource {
    async fn capture(&self) -> Result<AudioData, SpeechError> {
        self.clips
            .lock()
            .pop_front()
            .ok_or(SpeechError::NoSpeechDetected)
    }

    async fn stop(&self) {}

    fn is_available(&self) -> bool {
        true
    }
}

/// Source for deployments without a capture device
///
/// Every capture reports no speech, so read-along sessions run in read-only
/// mode. TODO: wire a cpal capture backend behind `AudioSource` so server
/// deployments with a microphone can listen for attempts.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilenceSource;

#[async_trait]
impl AudioSource for SilenceSource {
    async fn capture(&self) -> Result<AudioData, SpeechError> {
        Err(SpeechError::NoSpeechDetected)
    }

    async fn stop(&self) {}

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AudioFormat;

    fn clip(byte: u8) -> AudioData {
        AudioData::new(vec![byte], AudioFormat::Wav)
    }

    #[tokio::test]
    async fn memory_sink_records_played_clips() {
        let sink = MemorySink::new();

        sink.play(&clip(1)).await.unwrap();
        sink.play(&clip(2)).await.unwrap();

        assert_eq!(sink.play_count(), 2);
        assert_eq!(sink.played()[0].data(), &[1]);
    }

    #[tokio::test]
    async fn queue_source_replays_clips_in_order() {
        let source = QueueSource::new([clip(1), clip(2)]);

        assert_eq!(source.capture().await.unwrap().data(), &[1]);
        assert_eq!(source.capture().await.unwrap().data(), &[2]);
    }

    #[tokio::test]
    async fn exhausted_queue_reports_no_speech() {
        let source = QueueSource::new([]);

        let result = source.capture().await;

        assert!(matches!(result, Err(SpeechError::NoSpeechDetected)));
    }

    #[tokio::test]
    async fn silence_source_never_hears_anything() {
        let source = SilenceSource;

        assert!(!source.is_available());
        assert!(matches!(
            source.capture().await,
            Err(SpeechError::NoSpeechDetected)
        ));
    }
}
