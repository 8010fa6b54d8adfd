//! Tag endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, JsonBody};
use crate::models::{Tag, TagDraft};
use crate::state::AppState;

/// GET /api/tags - list all tags
async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.tags().find_all().await?))
}

/// GET /api/tags/{id} - get a single tag
async fn get_tag(State(state): State<AppState>, EntityId(id): EntityId) -> Result<Json<Tag>, ApiError> {
    state
        .tags()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found::<Tag>(id))
}

/// POST /api/tags - create a new tag
async fn create_tag(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<TagDraft>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let tag = state.tags().save(None, draft).await?;
    tracing::info!(tag_id = tag.id, "tag created");

    Ok((StatusCode::CREATED, Json(tag)))
}

/// PUT /api/tags/{id} - replace an existing tag
async fn update_tag(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(draft): JsonBody<TagDraft>,
) -> Result<Json<Tag>, ApiError> {
    Ok(Json(state.tags().save(Some(id), draft).await?))
}

/// DELETE /api/tags/{id} - delete a tag, detaching it from articles
async fn delete_tag(State(state): State<AppState>, EntityId(id): EntityId) -> Result<StatusCode, ApiError> {
    state.tags().delete_by_id(id).await?;
    tracing::info!(tag_id = id, "tag deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Tag routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tags", get(list_tags).post(create_tag))
        .route("/api/tags/{id}", get(get_tag).put(update_tag).delete(delete_tag))
}
