//! HTTP speech provider
//!
//! Implements `TextToSpeech` and `SpeechToText` against an OpenAI-compatible
//! API: `/audio/speech` for synthesis, `/audio/transcriptions` for
//! recognition.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::types::{AudioData, AudioFormat, Transcription};

/// Speech provider implementing both TTS and STT over HTTP
#[derive(Debug, Clone)]
pub struct HttpSpeechProvider {
    client: Client,
    config: SpeechConfig,
}

/// TTS request body
#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

/// Whisper transcription response
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

/// API error response
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    code: Option<String>,
}

impl HttpSpeechProvider {
    /// Create a new HTTP speech provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }

    fn tts_url(&self) -> String {
        format!("{}/audio/speech", self.config.base_url)
    }

    fn stt_url(&self) -> String {
        format!("{}/audio/transcriptions", self.config.base_url)
    }

    const fn response_format(&self) -> &'static str {
        match self.config.output_format {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Opus => "opus",
        }
    }

    async fn probe(&self) -> bool {
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
                warn!("Speech backend availability check failed: {}", e);
                false
            },
        }
    }
}

#[async_trait]
impl TextToSpeech for HttpSpeechProvider {
    #[instrument(skip(self, text), fields(text_len = text.len(), speed))]
    async fn synthesize(&self, text: &str, speed: f32) -> Result<AudioData, SpeechError> {
        debug!("Synthesizing speech");

        if text.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        // OpenAI TTS has a 4096 character limit
        if text.len() > 4096 {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: {} characters exceeds 4096 limit",
                text.len()
            )));
        }

        let request = TtsRequest {
            model: &self.config.tts_model,
            input: text,
            voice: &self.config.voice,
            response_format: self.response_format(),
            speed: if (speed - 1.0).abs() < f32::EPSILON {
                None
            } else {
                Some(speed)
            },
        };

        let response = self
            .client
            .post(self.tts_url())
            .bearer_auth(self.api_key())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_body) {
                return match api_error.error.code.as_deref() {
                    Some("rate_limit_exceeded") => Err(SpeechError::RateLimited),
                    Some("model_not_found") => Err(SpeechError::ModelNotAvailable(
                        self.config.tts_model.clone(),
                    )),
                    _ => Err(SpeechError::SynthesisFailed(api_error.error.message)),
                };
            }

            return Err(SpeechError::SynthesisFailed(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let audio_bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        debug!(audio_size = audio_bytes.len(), "Speech synthesis complete");

        Ok(AudioData::new(
            audio_bytes.to_vec(),
            self.config.output_format,
        ))
    }

    async fn is_available(&self) -> bool {
        self.probe().await
    }

    fn voice(&self) -> &str {
        &self.config.voice
    }

    fn model_name(&self) -> &str {
        &self.config.tts_model
    }
}

#[async_trait]
impl SpeechToText for HttpSpeechProvider {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), language = %language))]
    async fn transcribe(
        &self,
        audio: AudioData,
        language: &str,
    ) -> Result<Transcription, SpeechError> {
        debug!("Transcribing attempt audio");

        if audio.is_empty() {
            return Err(SpeechError::NoSpeechDetected);
        }

        let filename = audio.filename("attempt");
        let mime_type = audio.format().mime_type();
        let data = audio.into_data();

        let file_part = Part::bytes(data)
            .file_name(filename)
            .mime_str(mime_type)
            .map_err(|e| SpeechError::Configuration(format!("Invalid MIME type: {e}")))?;

        // Whisper expects the primary subtag only
        let language_hint = language.split('-').next().unwrap_or(language).to_string();

        let form = Form::new()
            .part("file", file_part)
            .text("model", self.config.stt_model.clone())
            .text("language", language_hint);

        let response = self
            .client
            .post(self.stt_url())
            .bearer_auth(self.api_key())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_body) {
                return match api_error.error.code.as_deref() {
                    Some("rate_limit_exceeded") => Err(SpeechError::RateLimited),
                    Some("model_not_found") => Err(SpeechError::ModelNotAvailable(
                        self.config.stt_model.clone(),
                    )),
                    _ => Err(SpeechError::TranscriptionFailed(api_error.error.message)),
                };
            }

            return Err(SpeechError::TranscriptionFailed(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let transcription_response: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(
            text_len = transcription_response.text.len(),
            "Transcription complete"
        );

        let mut transcription = Transcription::new(transcription_response.text);
        if let Some(lang) = transcription_response.language {
            transcription = transcription.with_language(lang);
        }

        Ok(transcription)
    }

    async fn is_available(&self) -> bool {
        self.probe().await
    }

    fn model_name(&self) -> &str {
        &self.config.stt_model
    }
}
