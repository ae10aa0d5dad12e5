//! Illustration generation client
//!
//! Talks to an OpenAI-compatible image generations endpoint and returns the
//! URL of the produced image.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::StoryGenConfig;
use crate::error::GenerationError;

/// Client for the image generations endpoint
#[derive(Debug, Clone)]
pub struct ImageModelClient {
    client: Client,
    config: StoryGenConfig,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: String,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: String,
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

impl ImageModelClient {
    /// Create a new illustration client
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

    fn generations_url(&self) -> String {
        format!("{}/images/generations", self.config.base_url)
    }

    /// Generate an illustration for a story topic, returning its URL
    #[instrument(skip(self))]
    pub async fn generate_image(&self, topic: &str) -> Result<String, GenerationError> {
        if topic.is_empty() {
            return Err(GenerationError::GenerationFailed(
                "Topic cannot be empty".to_string(),
            ));
        }

        debug!("Requesting illustration");

        let request = ImageRequest {
            model: &self.config.image_model,
            prompt: format!(
                "A warm, colorful children's book illustration about {topic}. \
                 Soft shapes, friendly characters, no text in the image."
            ),
            n: 1,
            size: &self.config.image_size,
        };

        let response = self
            .client
            .post(self.generations_url())
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
                        self.config.image_model.clone(),
                    )),
                    _ => Err(GenerationError::GenerationFailed(api_error.error.message)),
                };
            }

            return Err(GenerationError::GenerationFailed(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let image_response: ImageResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let url = image_response
            .data
            .into_iter()
            .next()
            .map(|datum| datum.url)
            .ok_or_else(|| {
                GenerationError::InvalidResponse("Response contained no image".to_string())
            })?;

        debug!("Illustration generated");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_client(mock_server: &MockServer) -> ImageModelClient {
        let config = StoryGenConfig {
            api_key: Some("test-api-key".to_string()),
            base_url: mock_server.uri(),
            ..Default::default()
        };
        ImageModelClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn generate_image_returns_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "dall-e-3",
                "n": 1,
                "size": "1024x1024"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "url": "https://img.example/cat.png" }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);

        let url = client.generate_image("cats").await.unwrap();
        assert_eq!(url, "https://img.example/cat.png");
    }

    #[tokio::test]
    async fn empty_topic_fails_before_request() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server);

        let result = client.generate_image("").await;

        assert!(matches!(result, Err(GenerationError::GenerationFailed(_))));
    }

    #[tokio::test]
    async fn empty_data_is_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": []
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);

        let result = client.generate_image("cats").await;

        assert!(matches!(result, Err(GenerationError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn rate_limit_is_mapped() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {
                    "message": "Rate limit exceeded",
                    "code": "rate_limit_exceeded"
                }
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);

        let result = client.generate_image("cats").await;

        assert!(matches!(result, Err(GenerationError::RateLimited)));
    }
}
