use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::{validate_body_id, validate_id, validate_name};
use super::{ApiError, ApiResponse, AppState};
use crate::db::Repository;
use crate::models::Genre;

#[utoipa::path(
    get,
    path = "/api/genres",
    tag = "genres",
    responses((status = 200, description = "All genres ordered by id", body = [Genre]))
)]
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Genre>>>, ApiError> {
    let genres = state.repositories().genres.select_all().await?;
    Ok(Json(ApiResponse::success(genres)))
}

#[utoipa::path(
    get,
    path = "/api/genres/{id}",
    tag = "genres",
    params(("id" = String, Path, description = "Genre id")),
    responses(
        (status = 200, description = "Genre found", body = Genre),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Genre>>, ApiError> {
    let id = validate_id(&id)?;
    let genre = state
        .repositories()
        .genres
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Genre", id))?;
    Ok(Json(ApiResponse::success(genre)))
}

#[utoipa::path(
    post,
    path = "/api/genres",
    tag = "genres",
    security(("bearer" = [])),
    request_body = Genre,
    responses(
        (status = 200, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid genre"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 409, description = "Id already taken")
    )
)]
pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Genre>,
) -> Result<Json<ApiResponse<Genre>>, ApiError> {
    validate_name("Genre name", &payload.name)?;

    let genre = state.repositories().genres.insert(payload).await?;
    Ok(Json(ApiResponse::success(genre)))
}

#[utoipa::path(
    put,
    path = "/api/genres/{id}",
    tag = "genres",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Genre id")),
    request_body = Genre,
    responses(
        (status = 200, description = "Genre replaced", body = Genre),
        (status = 400, description = "Invalid genre"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn update_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<Genre>,
) -> Result<Json<ApiResponse<Genre>>, ApiError> {
    let id = validate_body_id(&id, &payload.id)?;
    validate_name("Genre name", &payload.name)?;

    let genre = state
        .repositories()
        .genres
        .replace_by_id(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(genre)))
}

#[utoipa::path(
    delete,
    path = "/api/genres/{id}",
    tag = "genres",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Genre id")),
    responses(
        (status = 200, description = "Genre deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn delete_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(&id)?;
    if !state.repositories().genres.delete_by_id(id).await? {
        return Err(ApiError::not_found("Genre", id));
    }
    Ok(Json(ApiResponse::success(())))
}
