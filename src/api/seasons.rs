use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::{validate_body_id, validate_id, validate_number};
use super::{ApiError, ApiResponse, AppState};
use crate::db::Repository;
use crate::models::{Episode, Season};

fn validate_season(season: &Season) -> Result<(), ApiError> {
    validate_id(&season.show_id)
        .map_err(|_| ApiError::validation("Season must reference a show"))?;
    validate_number("season number", season.number)?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/seasons",
    tag = "seasons",
    responses((status = 200, description = "All seasons ordered by id", body = [Season]))
)]
pub async fn list_seasons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Season>>>, ApiError> {
    let seasons = state.repositories().seasons.select_all().await?;
    Ok(Json(ApiResponse::success(seasons)))
}

#[utoipa::path(
    get,
    path = "/api/seasons/{id}",
    tag = "seasons",
    params(("id" = String, Path, description = "Season id")),
    responses(
        (status = 200, description = "Season found", body = Season),
        (status = 404, description = "Season not found")
    )
)]
pub async fn get_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Season>>, ApiError> {
    let id = validate_id(&id)?;
    let season = state
        .repositories()
        .seasons
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Season", id))?;
    Ok(Json(ApiResponse::success(season)))
}

#[utoipa::path(
    get,
    path = "/api/seasons/{id}/episodes",
    tag = "seasons",
    params(("id" = String, Path, description = "Season id")),
    responses(
        (status = 200, description = "Episodes referencing the season, by number", body = [Episode])
    )
)]
pub async fn list_season_episodes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Episode>>>, ApiError> {
    let id = validate_id(&id)?;
    let episodes = state.show_manager().episodes_for_season(id).await?;
    Ok(Json(ApiResponse::success(episodes)))
}

#[utoipa::path(
    post,
    path = "/api/seasons",
    tag = "seasons",
    security(("bearer" = [])),
    request_body = Season,
    responses(
        (status = 200, description = "Season created", body = Season),
        (status = 400, description = "Invalid season"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 409, description = "Id already taken")
    )
)]
pub async fn create_season(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Season>,
) -> Result<Json<ApiResponse<Season>>, ApiError> {
    validate_season(&payload)?;

    let season = state.repositories().seasons.insert(payload).await?;
    tracing::info!(season_id = %season.id, show_id = %season.show_id, "Season created");
    Ok(Json(ApiResponse::success(season)))
}

#[utoipa::path(
    put,
    path = "/api/seasons/{id}",
    tag = "seasons",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Season id")),
    request_body = Season,
    responses(
        (status = 200, description = "Season replaced", body = Season),
        (status = 400, description = "Invalid season"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Season not found")
    )
)]
pub async fn update_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<Season>,
) -> Result<Json<ApiResponse<Season>>, ApiError> {
    let id = validate_body_id(&id, &payload.id)?;
    validate_season(&payload)?;

    let season = state.repositories().seasons.replace_by_id(id, payload).await?;
    Ok(Json(ApiResponse::success(season)))
}

/// Episodes of the deleted season are left in place.
#[utoipa::path(
    delete,
    path = "/api/seasons/{id}",
    tag = "seasons",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Season id")),
    responses(
        (status = 200, description = "Season deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Season not found")
    )
)]
pub async fn delete_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(&id)?;
    if !state.repositories().seasons.delete_by_id(id).await? {
        return Err(ApiError::not_found("Season", id));
    }
    Ok(Json(ApiResponse::success(())))
}
