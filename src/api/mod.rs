use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::TokenValidator;
use crate::config::Config;
use crate::db::DocumentStore;
use crate::managers::{ShowManager, UserManager};
use crate::state::{Repositories, SharedState};

pub mod auth;
mod channels;
mod episodes;
mod error;
mod genres;
mod health;
mod observability;
pub mod openapi;
mod seasons;
mod shows;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.shared.store
    }

    #[must_use]
    pub fn repositories(&self) -> &Repositories {
        &self.shared.repositories
    }

    #[must_use]
    pub fn show_manager(&self) -> &Arc<dyn ShowManager> {
        &self.shared.show_manager
    }

    #[must_use]
    pub fn user_manager(&self) -> &Arc<dyn UserManager> {
        &self.shared.user_manager
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenValidator {
        &self.shared.tokens
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();
    let metrics_enabled = state.prometheus_handle.is_some();

    let api_router = Router::new()
        .merge(create_protected_router(state.clone()))
        .route("/health", get(health::health))
        .route("/shows", get(shows::list_shows))
        .route("/shows/top", get(shows::top_shows))
        .route("/shows/{id}", get(shows::get_show))
        .route("/shows/{id}/seasons", get(shows::list_show_seasons))
        .route("/seasons", get(seasons::list_seasons))
        .route("/seasons/{id}", get(seasons::get_season))
        .route("/seasons/{id}/episodes", get(seasons::list_season_episodes))
        .route("/episodes", get(episodes::list_episodes))
        .route("/episodes/{id}", get(episodes::get_episode))
        .route("/channels", get(channels::list_channels))
        .route("/channels/{id}", get(channels::get_channel))
        .route("/genres", get(genres::list_genres))
        .route("/genres/{id}", get(genres::get_genre))
        .with_state(state.clone());

    let cors_layer = if cors_origins.is_empty() || cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let mut app = Router::new()
        .nest("/api", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", openapi::openapi_spec()));

    if metrics_enabled {
        app = app.route(
            "/metrics",
            get(observability::get_metrics).with_state(state),
        );
    }

    app.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(observability::logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer.allow_methods(Any).allow_headers(Any)),
    )
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows", post(shows::create_show))
        .route(
            "/shows/{id}",
            axum::routing::put(shows::update_show).delete(shows::delete_show),
        )
        .route("/seasons", post(seasons::create_season))
        .route(
            "/seasons/{id}",
            axum::routing::put(seasons::update_season).delete(seasons::delete_season),
        )
        .route("/episodes", post(episodes::create_episode))
        .route(
            "/episodes/{id}",
            axum::routing::put(episodes::update_episode).delete(episodes::delete_episode),
        )
        .route("/channels", post(channels::create_channel))
        .route(
            "/channels/{id}",
            axum::routing::put(channels::update_channel).delete(channels::delete_channel),
        )
        .route("/genres", post(genres::create_genre))
        .route(
            "/genres/{id}",
            axum::routing::put(genres::update_genre).delete(genres::delete_genre),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/by-login/{login}", get(users::get_user_by_login))
        .route("/users/by-email/{email}", get(users::get_user_by_email))
        .route("/users/validate-password", post(users::validate_password))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
