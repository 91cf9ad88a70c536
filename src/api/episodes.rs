use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::{validate_body_id, validate_id, validate_name, validate_number};
use super::{ApiError, ApiResponse, AppState};
use crate::db::Repository;
use crate::models::Episode;

fn validate_episode(episode: &Episode) -> Result<(), ApiError> {
    validate_id(&episode.season_id)
        .map_err(|_| ApiError::validation("Episode must reference a season"))?;
    validate_number("episode number", episode.number)?;
    validate_name("Episode title", &episode.title)
}

#[utoipa::path(
    get,
    path = "/api/episodes",
    tag = "episodes",
    responses((status = 200, description = "All episodes ordered by id", body = [Episode]))
)]
pub async fn list_episodes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Episode>>>, ApiError> {
    let episodes = state.repositories().episodes.select_all().await?;
    Ok(Json(ApiResponse::success(episodes)))
}

#[utoipa::path(
    get,
    path = "/api/episodes/{id}",
    tag = "episodes",
    params(("id" = String, Path, description = "Episode id")),
    responses(
        (status = 200, description = "Episode found", body = Episode),
        (status = 404, description = "Episode not found")
    )
)]
pub async fn get_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Episode>>, ApiError> {
    let id = validate_id(&id)?;
    let episode = state
        .repositories()
        .episodes
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Episode", id))?;
    Ok(Json(ApiResponse::success(episode)))
}

#[utoipa::path(
    post,
    path = "/api/episodes",
    tag = "episodes",
    security(("bearer" = [])),
    request_body = Episode,
    responses(
        (status = 200, description = "Episode created", body = Episode),
        (status = 400, description = "Invalid episode"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 409, description = "Id already taken")
    )
)]
pub async fn create_episode(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Episode>,
) -> Result<Json<ApiResponse<Episode>>, ApiError> {
    validate_episode(&payload)?;

    let episode = state.repositories().episodes.insert(payload).await?;
    tracing::info!(episode_id = %episode.id, season_id = %episode.season_id, "Episode created");
    Ok(Json(ApiResponse::success(episode)))
}

#[utoipa::path(
    put,
    path = "/api/episodes/{id}",
    tag = "episodes",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Episode id")),
    request_body = Episode,
    responses(
        (status = 200, description = "Episode replaced", body = Episode),
        (status = 400, description = "Invalid episode"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Episode not found")
    )
)]
pub async fn update_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<Episode>,
) -> Result<Json<ApiResponse<Episode>>, ApiError> {
    let id = validate_body_id(&id, &payload.id)?;
    validate_episode(&payload)?;

    let episode = state
        .repositories()
        .episodes
        .replace_by_id(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(episode)))
}

#[utoipa::path(
    delete,
    path = "/api/episodes/{id}",
    tag = "episodes",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Episode id")),
    responses(
        (status = 200, description = "Episode deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Episode not found")
    )
)]
pub async fn delete_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(&id)?;
    if !state.repositories().episodes.delete_by_id(id).await? {
        return Err(ApiError::not_found("Episode", id));
    }
    Ok(Json(ApiResponse::success(())))
}
