//! Speech synthesis proxy
//!
//! Clients that play audio themselves (browsers without a usable built-in
//! voice) post text here and get synthesized audio back.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Request body for synthesis
#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    /// Text to speak
    pub text: String,
    /// Speech rate multiplier, defaults to 1.0
    #[serde(default = "default_rate")]
    pub rate: f32,
}

const fn default_rate() -> f32 {
    1.0
}

/// POST /v1/speech/synthesize - synthesize text and return the audio
#[instrument(skip(state, request), fields(text_len = request.text.len()))]
pub async fn synthesize(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Response, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text must not be empty".to_string()));
    }

    let audio = state
        .tts
        .synthesize(&request.text, request.rate)
        .await
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))?;

    let mime_type = audio.format().mime_type();
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime_type)],
        audio.into_data(),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesize_request_defaults_rate() {
        let request: SynthesizeRequest = serde_json::from_str(r#"{"text": "cat"}"#).unwrap();
        assert!((request.rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn synthesize_request_accepts_rate() {
        let request: SynthesizeRequest =
            serde_json::from_str(r#"{"text": "cat", "rate": 0.5}"#).unwrap();
        assert!((request.rate - 0.5).abs() < f32::EPSILON);
    }
}
