//! Article endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, JsonBody};
use crate::models::{Article, ArticleDraft};
use crate::state::AppState;

/// GET /api/articles - list all articles with their tags
async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = state.articles().find_all().await?;
    Ok(Json(articles))
}

/// GET /api/articles/{id} - get a single article
async fn get_article(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<Article>, ApiError> {
    state
        .articles()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found::<Article>(id))
}

/// POST /api/articles - create a new article
async fn create_article(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<ArticleDraft>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let article = state.articles().save(None, draft).await?;
    tracing::info!(article_id = article.id, "article created");

    Ok((StatusCode::CREATED, Json(article)))
}

/// PUT /api/articles/{id} - replace an existing article
async fn update_article(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(draft): JsonBody<ArticleDraft>,
) -> Result<Json<Article>, ApiError> {
    let article = state.articles().save(Some(id), draft).await?;
    Ok(Json(article))
}

/// DELETE /api/articles/{id} - delete an article
async fn delete_article(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<StatusCode, ApiError> {
    state.articles().delete_by_id(id).await?;
    tracing::info!(article_id = id, "article deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Article routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/articles", get(list_articles).post(create_article))
        .route(
            "/api/articles/{id}",
            get(get_article).put(update_article).delete(delete_article),
        )
}
