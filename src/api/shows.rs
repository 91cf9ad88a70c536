use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::validation::{top_count, validate_body_id, validate_id, validate_name};
use super::{ApiError, ApiResponse, AppState, TopShowsQuery};
use crate::auth::Claims;
use crate::models::{Season, Show};

#[utoipa::path(
    get,
    path = "/api/shows",
    tag = "shows",
    responses(
        (status = 200, description = "All shows ordered by id", body = [Show])
    )
)]
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Show>>>, ApiError> {
    let shows = state.show_manager().list_shows().await?;
    Ok(Json(ApiResponse::success(shows)))
}

#[utoipa::path(
    get,
    path = "/api/shows/{id}",
    tag = "shows",
    params(("id" = String, Path, description = "Show id")),
    responses(
        (status = 200, description = "Show found", body = Show),
        (status = 404, description = "Show not found")
    )
)]
pub async fn get_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Show>>, ApiError> {
    let id = validate_id(&id)?;
    let show = state.show_manager().get_show(id).await?;
    Ok(Json(ApiResponse::success(show)))
}

/// Highest rated shows, optionally narrowed to names containing `name`.
#[utoipa::path(
    get,
    path = "/api/shows/top",
    tag = "shows",
    params(TopShowsQuery),
    responses(
        (status = 200, description = "Shows sorted by rating, best first", body = [Show])
    )
)]
pub async fn top_shows(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopShowsQuery>,
) -> Result<Json<ApiResponse<Vec<Show>>>, ApiError> {
    let shows = state
        .show_manager()
        .top_shows(query.name.as_deref(), top_count(query.count))
        .await?;
    Ok(Json(ApiResponse::success(shows)))
}

#[utoipa::path(
    get,
    path = "/api/shows/{id}/seasons",
    tag = "shows",
    params(("id" = String, Path, description = "Show id")),
    responses(
        (status = 200, description = "Seasons referencing the show, by number", body = [Season])
    )
)]
pub async fn list_show_seasons(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Season>>>, ApiError> {
    let id = validate_id(&id)?;
    let seasons = state.show_manager().seasons_for_show(id).await?;
    Ok(Json(ApiResponse::success(seasons)))
}

#[utoipa::path(
    post,
    path = "/api/shows",
    tag = "shows",
    security(("bearer" = [])),
    request_body = Show,
    responses(
        (status = 200, description = "Show created", body = Show),
        (status = 400, description = "Invalid show"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 409, description = "Id already taken")
    )
)]
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<Show>,
) -> Result<Json<ApiResponse<Show>>, ApiError> {
    validate_name("Show name", &payload.name)?;

    let show = state.show_manager().create_show(payload).await?;
    tracing::info!(
        target: "watchall::audit",
        subject = %claims.sub,
        show_id = %show.id,
        "Show created"
    );
    Ok(Json(ApiResponse::success(show)))
}

#[utoipa::path(
    put,
    path = "/api/shows/{id}",
    tag = "shows",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Show id")),
    request_body = Show,
    responses(
        (status = 200, description = "Show replaced", body = Show),
        (status = 400, description = "Invalid show"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Show not found")
    )
)]
pub async fn update_show(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<Show>,
) -> Result<Json<ApiResponse<Show>>, ApiError> {
    let id = validate_body_id(&id, &payload.id)?;
    validate_name("Show name", &payload.name)?;

    let show = state.show_manager().update_show(id, payload).await?;
    tracing::info!(
        target: "watchall::audit",
        subject = %claims.sub,
        show_id = %show.id,
        "Show replaced"
    );
    Ok(Json(ApiResponse::success(show)))
}

/// Seasons of the deleted show are left in place.
#[utoipa::path(
    delete,
    path = "/api/shows/{id}",
    tag = "shows",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Show id")),
    responses(
        (status = 200, description = "Show deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Show not found")
    )
)]
pub async fn delete_show(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(&id)?;
    state.show_manager().delete_show(id).await?;
    tracing::info!(
        target: "watchall::audit",
        subject = %claims.sub,
        show_id = id,
        "Show deleted"
    );
    Ok(Json(ApiResponse::success(())))
}
