//! Playback handlers - read-along session lifecycle and control
//!
//! Sessions are driven through POST control endpoints; playback signals
//! (word advanced, retry, completion, faults) stream to the client over
//! server-sent events.

use std::convert::Infallible;
use std::sync::Arc;

use application::{PlaybackSnapshot, ReadAlongController};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use domain::{SessionId, SpeechRate};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Response body for session creation
#[derive(Debug, Serialize)]
pub struct OpenSessionResponse {
    pub session_id: String,
    pub snapshot: PlaybackSnapshot,
}

/// Request body for rate changes
#[derive(Debug, Deserialize)]
pub struct SetRateRequest {
    /// Speech rate multiplier; values outside [0.5, 2.0] are clamped
    pub rate: f32,
}

fn parse_session_id(id: &str) -> Result<SessionId, ApiError> {
    SessionId::parse(id).map_err(|_| ApiError::BadRequest(format!("Invalid session ID: {id}")))
}

fn get_controller(state: &AppState, id: &str) -> Result<ReadAlongController, ApiError> {
    let session_id = parse_session_id(id)?;
    Ok(state.playback.get(session_id)?)
}

/// POST /v1/stories/{id}/playback - open a read-along session for a story
#[instrument(skip(state))]
pub async fn open_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<OpenSessionResponse>), ApiError> {
    let story_id = domain::StoryId::parse(&id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid story ID: {id}")))?;
    let story = state.story_service.get_story(story_id).await?;

    let session_id = state.playback.open(Arc::new(story));
    let controller = state.playback.get(session_id)?;
    controller.set_rate(SpeechRate::new(state.config.playback.default_rate));

    Ok((
        StatusCode::CREATED,
        Json(OpenSessionResponse {
            session_id: session_id.to_string(),
            snapshot: controller.snapshot(),
        }),
    ))
}

/// GET /v1/playback/{id} - current session snapshot
pub async fn session_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlaybackSnapshot>, ApiError> {
    let controller = get_controller(&state, &id)?;
    Ok(Json(controller.snapshot()))
}

/// DELETE /v1/playback/{id} - close a session
#[instrument(skip(state))]
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id = parse_session_id(&id)?;
    state.playback.close(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/playback/{id}/start - start or resume playback
#[instrument(skip(state))]
pub async fn start(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlaybackSnapshot>, ApiError> {
    let controller = get_controller(&state, &id)?;
    controller.start().await;
    Ok(Json(controller.snapshot()))
}

/// POST /v1/playback/{id}/pause - pause playback
#[instrument(skip(state))]
pub async fn pause(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlaybackSnapshot>, ApiError> {
    let controller = get_controller(&state, &id)?;
    controller.pause().await;
    Ok(Json(controller.snapshot()))
}

/// POST /v1/playback/{id}/restart - restart from the first word
#[instrument(skip(state))]
pub async fn restart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlaybackSnapshot>, ApiError> {
    let controller = get_controller(&state, &id)?;
    controller.restart().await;
    Ok(Json(controller.snapshot()))
}

/// POST /v1/playback/{id}/microphone - confirm microphone access
pub async fn grant_microphone(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlaybackSnapshot>, ApiError> {
    let controller = get_controller(&state, &id)?;
    controller.grant_microphone();
    Ok(Json(controller.snapshot()))
}

/// PUT /v1/playback/{id}/rate - adjust the speech rate
pub async fn set_rate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetRateRequest>,
) -> Result<Json<PlaybackSnapshot>, ApiError> {
    let controller = get_controller(&state, &id)?;
    controller.set_rate(SpeechRate::new(request.rate));
    Ok(Json(controller.snapshot()))
}

/// GET /v1/playback/{id}/events - stream playback signals as SSE
pub async fn events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let controller = get_controller(&state, &id)?;

    let stream = BroadcastStream::new(controller.subscribe()).filter_map(|signal| async move {
        match signal {
            Ok(signal) => Event::default().json_data(&signal).ok().map(Ok),
            // A lagged subscriber just misses some signals
            Err(_) => None,
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_session_id_is_bad_request() {
        let result = parse_session_id("not-a-uuid");
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn set_rate_request_deserializes() {
        let request: SetRateRequest = serde_json::from_str(r#"{"rate": 1.5}"#).unwrap();
        assert!((request.rate - 1.5).abs() < f32::EPSILON);
    }
}
