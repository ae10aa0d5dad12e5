//! Configuration for story and illustration generation

use serde::{Deserialize, Serialize};

/// Configuration for the generation clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryGenConfig {
    /// API key for the generation backend
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL (OpenAI-compatible)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for story text
    #[serde(default = "default_story_model")]
    pub story_model: String,

    /// Model used for illustrations
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Illustration size, e.g. "1024x1024"
    #[serde(default = "default_image_size")]
    pub image_size: String,

    /// Sampling temperature for story text
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per generated story
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_story_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

const fn default_temperature() -> f32 {
    0.8
}

const fn default_max_tokens() -> u32 {
    400
}

const fn default_timeout_ms() -> u64 {
    60_000
}

impl Default for StoryGenConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            story_model: default_story_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl StoryGenConfig {
    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_none() {
            return Err("API key is required for story generation".to_string());
        }

        if self.base_url.is_empty() {
            return Err("Base URL must not be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }

        if self.max_tokens == 0 {
            return Err("Max tokens must be greater than 0".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
