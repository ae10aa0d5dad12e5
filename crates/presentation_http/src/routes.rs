//! Route definitions

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Story API (v1)
        .route(
            "/v1/stories",
            get(handlers::stories::list_stories).post(handlers::stories::create_story),
        )
        .route("/v1/stories/{id}", get(handlers::stories::get_story))
        .route("/v1/stories/{id}/like", post(handlers::stories::like_story))
        .route(
            "/v1/stories/{id}/playback",
            post(handlers::playback::open_session),
        )
        // Playback API (v1)
        .route("/v1/playback/{id}", get(handlers::playback::session_status))
        .route("/v1/playback/{id}", delete(handlers::playback::close_session))
        .route("/v1/playback/{id}/start", post(handlers::playback::start))
        .route("/v1/playback/{id}/pause", post(handlers::playback::pause))
        .route("/v1/playback/{id}/restart", post(handlers::playback::restart))
        .route(
            "/v1/playback/{id}/microphone",
            post(handlers::playback::grant_microphone),
        )
        .route("/v1/playback/{id}/rate", put(handlers::playback::set_rate))
        .route("/v1/playback/{id}/events", get(handlers::playback::events))
        // Speech synthesis proxy
        .route("/v1/speech/synthesize", post(handlers::speech::synthesize))
        // Attach state
        .with_state(state)
}
