//! Application state shared across handlers

use std::sync::Arc;

use ai_speech::TextToSpeech;
use application::{PlaybackRegistry, StoryService};
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Story service for generation and the library
    pub story_service: Arc<StoryService>,
    /// Registry of active read-along playback sessions
    pub playback: Arc<PlaybackRegistry>,
    /// TTS provider backing the synthesis proxy endpoint
    pub tts: Arc<dyn TextToSpeech>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}
