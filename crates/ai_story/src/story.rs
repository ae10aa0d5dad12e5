//! Story text generation client
//!
//! Talks to an OpenAI-compatible chat completions endpoint. The system prompt
//! keeps stories short and simple enough for a child to read along word by
//! word.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::StoryGenConfig;
use crate::error::GenerationError;

/// System prompt framing every generation request
const SYSTEM_PROMPT: &str = "You are a storyteller for young children. Write a short, \
    cheerful story of three to five sentences about the given topic. Use simple words \
    a five-year-old can read aloud. Do not use headings, emoji, or quotation marks.";

/// A generated story and the model that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryCompletion {
    /// The story text
    pub content: String,
    /// Model name reported by the backend
    pub model: String,
}

/// Client for the chat completions endpoint
#[derive(Debug, Clone)]
pub struct StoryModelClient {
    client: Client,
    config: StoryGenConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    code: Option<String>,
}

impl StoryModelClient {
    /// Create a new story generation client
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Configuration` if the configuration is
    /// invalid or the HTTP client cannot be built.
    pub fn new(config: StoryGenConfig) -> Result<Self, GenerationError> {
        config.validate().map_err(GenerationError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                GenerationError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Generate a short children's story about a topic
    #[instrument(skip(self))]
    pub async fn generate_story(&self, topic: &str) -> Result<StoryCompletion, GenerationError> {
        if topic.is_empty() {
            return Err(GenerationError::GenerationFailed(
                "Topic cannot be empty".to_string(),
            ));
        }

        debug!("Requesting story generation");

        let user_prompt = format!("Write a story about: {topic}");
        let request = ChatRequest {
            model: &self.config.story_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_body) {
                return match api_error.error.code.as_deref() {
                    Some("rate_limit_exceeded") => Err(GenerationError::RateLimited),
                    Some("model_not_found") => Err(GenerationError::ModelNotAvailable(
                        self.config.story_model.clone(),
                    )),
                    _ => Err(GenerationError::GenerationFailed(api_error.error.message)),
                };
            }

            return Err(GenerationError::GenerationFailed(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                GenerationError::InvalidResponse("Response contained no story text".to_string())
            })?;

        debug!(content_len = content.len(), model = %chat_response.model, "Story generated");

        Ok(StoryCompletion {
            content,
            model: chat_response.model,
        })
    }

    /// Check whether the backend is reachable
    pub async fn is_available(&self) -> bool {
        let models_url = format!("{}/models", self.config.base_url);

        match self
            .client
            .get(&models_url)
            .bearer_auth(self.api_key())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Story backend availability check failed: {}", e);
                false
            },
        }
    }
}
