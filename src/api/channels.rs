use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::{validate_body_id, validate_id, validate_name};
use super::{ApiError, ApiResponse, AppState};
use crate::db::Repository;
use crate::models::Channel;

#[utoipa::path(
    get,
    path = "/api/channels",
    tag = "channels",
    responses((status = 200, description = "All channels ordered by id", body = [Channel]))
)]
pub async fn list_channels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Channel>>>, ApiError> {
    let channels = state.repositories().channels.select_all().await?;
    Ok(Json(ApiResponse::success(channels)))
}

#[utoipa::path(
    get,
    path = "/api/channels/{id}",
    tag = "channels",
    params(("id" = String, Path, description = "Channel id")),
    responses(
        (status = 200, description = "Channel found", body = Channel),
        (status = 404, description = "Channel not found")
    )
)]
pub async fn get_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Channel>>, ApiError> {
    let id = validate_id(&id)?;
    let channel = state
        .repositories()
        .channels
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Channel", id))?;
    Ok(Json(ApiResponse::success(channel)))
}

#[utoipa::path(
    post,
    path = "/api/channels",
    tag = "channels",
    security(("bearer" = [])),
    request_body = Channel,
    responses(
        (status = 200, description = "Channel created", body = Channel),
        (status = 400, description = "Invalid channel"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 409, description = "Id already taken")
    )
)]
pub async fn create_channel(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Channel>,
) -> Result<Json<ApiResponse<Channel>>, ApiError> {
    validate_name("Channel name", &payload.name)?;

    let channel = state.repositories().channels.insert(payload).await?;
    Ok(Json(ApiResponse::success(channel)))
}

#[utoipa::path(
    put,
    path = "/api/channels/{id}",
    tag = "channels",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Channel id")),
    request_body = Channel,
    responses(
        (status = 200, description = "Channel replaced", body = Channel),
        (status = 400, description = "Invalid channel"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Channel not found")
    )
)]
pub async fn update_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<Channel>,
) -> Result<Json<ApiResponse<Channel>>, ApiError> {
    let id = validate_body_id(&id, &payload.id)?;
    validate_name("Channel name", &payload.name)?;

    let channel = state
        .repositories()
        .channels
        .replace_by_id(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(channel)))
}

/// Shows keep their `channelId` after the channel is gone.
#[utoipa::path(
    delete,
    path = "/api/channels/{id}",
    tag = "channels",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Channel id")),
    responses(
        (status = 200, description = "Channel deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Channel not found")
    )
)]
pub async fn delete_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(&id)?;
    if !state.repositories().channels.delete_by_id(id).await? {
        return Err(ApiError::not_found("Channel", id));
    }
    Ok(Json(ApiResponse::success(())))
}
