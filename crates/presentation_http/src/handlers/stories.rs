//! Story handlers - generation and the library

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use domain::{Story, StoryId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Request body for story creation
#[derive(Debug, Deserialize)]
pub struct CreateStoryRequest {
    /// The topic the child asked for
    pub topic: String,
}

/// A story as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct StoryResponse {
    pub id: String,
    pub topic: String,
    pub content: String,
    pub illustration: Option<String>,
    pub words: Vec<String>,
    pub word_count: usize,
    pub likes: u32,
    pub created_at: String,
}

impl From<&Story> for StoryResponse {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id.to_string(),
            topic: story.topic.clone(),
            content: story.content.clone(),
            illustration: story.illustration.clone(),
            words: story.words().to_vec(),
            word_count: story.word_count(),
            likes: story.likes(),
            created_at: story.created_at.to_rfc3339(),
        }
    }
}

/// Response body for likes
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub id: String,
    pub likes: u32,
}

fn parse_story_id(id: &str) -> Result<StoryId, ApiError> {
    StoryId::parse(id).map_err(|_| ApiError::BadRequest(format!("Invalid story ID: {id}")))
}

/// POST /v1/stories - generate and store a new story
#[instrument(skip(state, request), fields(topic = %request.topic))]
pub async fn create_story(
    State(state): State<AppState>,
    Json(request): Json<CreateStoryRequest>,
) -> Result<(StatusCode, Json<StoryResponse>), ApiError> {
    let story = state.story_service.create_story(&request.topic).await?;
    Ok((StatusCode::CREATED, Json(StoryResponse::from(&story))))
}

/// GET /v1/stories - list all stories, newest first
pub async fn list_stories(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoryResponse>>, ApiError> {
    let stories = state.story_service.list_stories().await?;
    Ok(Json(stories.iter().map(StoryResponse::from).collect()))
}

/// GET /v1/stories/{id} - fetch one story
pub async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoryResponse>, ApiError> {
    let story_id = parse_story_id(&id)?;
    let story = state.story_service.get_story(story_id).await?;
    Ok(Json(StoryResponse::from(&story)))
}

/// POST /v1/stories/{id}/like - increment a story's like counter
#[instrument(skip(state))]
pub async fn like_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let story_id = parse_story_id(&id)?;
    let likes = state.story_service.like_story(story_id).await?;
    Ok(Json(LikeResponse { id, likes }))
}
