//! User profile endpoints. Every route here requires a bearer token and
//! responses go through [`UserDto`], so password hashes never leave.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::{validate_body_id, validate_id};
use super::{ApiError, ApiResponse, AppState, UserDto, ValidatePasswordRequest};
use crate::auth::Claims;
use crate::models::UserProfile;

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All users ordered by id", body = [UserDto]),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.user_manager().get_all_users().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let id = validate_id(&id)?;
    let user = state.user_manager().get_by_id(id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/users/by-login/{login}",
    tag = "users",
    security(("bearer" = [])),
    params(("login" = String, Path, description = "Exact login")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No user with this login")
    )
)]
pub async fn get_user_by_login(
    State(state): State<Arc<AppState>>,
    Path(login): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.user_manager().get_by_login(&login).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/users/by-email/{email}",
    tag = "users",
    security(("bearer" = [])),
    params(("email" = String, Path, description = "Exact email address")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No user with this email")
    )
)]
pub async fn get_user_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.user_manager().get_by_email(&email).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    security(("bearer" = [])),
    request_body = UserProfile,
    responses(
        (status = 200, description = "User created", body = UserDto),
        (status = 400, description = "Invalid profile"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 409, description = "Id already taken")
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UserProfile>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.user_manager().insert_profile(payload).await?;
    tracing::info!(
        target: "watchall::audit",
        subject = %claims.sub,
        user_id = %user.id,
        "User profile created"
    );
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "User id")),
    request_body = UserProfile,
    responses(
        (status = 200, description = "User replaced", body = UserDto),
        (status = 400, description = "Invalid profile"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(mut payload): Json<UserProfile>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    payload.id = validate_body_id(&id, &payload.id)?.to_string();

    let user = state.user_manager().update_profile(payload).await?;
    tracing::info!(
        target: "watchall::audit",
        subject = %claims.sub,
        user_id = %user.id,
        "User profile replaced"
    );
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(&id)?;
    state.user_manager().delete_profile(id).await?;
    tracing::info!(
        target: "watchall::audit",
        subject = %claims.sub,
        user_id = id,
        "User profile deleted"
    );
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    post,
    path = "/api/users/validate-password",
    tag = "users",
    security(("bearer" = [])),
    request_body = ValidatePasswordRequest,
    responses(
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 501, description = "Password validation is not implemented")
    )
)]
pub async fn validate_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ValidatePasswordRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let valid = state
        .user_manager()
        .validate_password(&payload.login, &payload.password)
        .await?;
    Ok(Json(ApiResponse::success(valid)))
}
