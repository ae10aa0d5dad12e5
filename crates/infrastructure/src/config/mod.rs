//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//!
//! Generation and speech settings reuse the config types of their crates;
//! playback settings live here.

mod server;

use ai_speech::SpeechConfig;
use ai_story::StoryGenConfig;
use serde::{Deserialize, Serialize};

pub use server::ServerConfig;

/// Read-along playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// BCP 47 language tag for recognition
    #[serde(default = "default_language")]
    pub language: String,

    /// Emit interim transcripts before finalization
    #[serde(default = "default_interim_results")]
    pub interim_results: bool,

    /// Keep listening after the first final transcript
    #[serde(default)]
    pub continuous: bool,

    /// Default speech rate multiplier for new sessions
    #[serde(default = "default_rate")]
    pub default_rate: f32,
}

fn default_language() -> String {
    "en-US".to_string()
}

const fn default_interim_results() -> bool {
    true
}

const fn default_rate() -> f32 {
    1.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            interim_results: default_interim_results(),
            continuous: false,
            default_rate: default_rate(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Story and illustration generation configuration
    #[serde(default)]
    pub generation: StoryGenConfig,

    /// Speech processing configuration
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Read-along playback configuration
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// # Errors
    ///
    /// Returns a `config::ConfigError` when the file or environment
    /// overrides cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., STORYNEST_SERVER_PORT)
            .add_source(
                config::Environment::with_prefix("STORYNEST")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_playback_config() {
        let playback = PlaybackConfig::default();

        assert_eq!(playback.language, "en-US");
        assert!(playback.interim_results);
        assert!(!playback.continuous);
        assert!((playback.default_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn default_app_config_composes_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.speech.voice, "fable");
        assert_eq!(config.generation.story_model, "gpt-4o-mini");
        assert_eq!(config.server.port, 3000);
    }
}
