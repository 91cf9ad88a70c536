//! OpenAPI description assembled from the `#[utoipa::path]` annotations on
//! the handlers.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::types::{HealthStatus, UserDto, ValidatePasswordRequest};
use crate::models::{Channel, Episode, Genre, Season, Show, UserProfile};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "WatchAll API",
        description = "Shows, seasons, episodes, channels, genres and user profiles. \
                       Write operations and all user routes require a bearer token."
    ),
    paths(
        super::health::health,
        super::shows::list_shows,
        super::shows::get_show,
        super::shows::top_shows,
        super::shows::list_show_seasons,
        super::shows::create_show,
        super::shows::update_show,
        super::shows::delete_show,
        super::seasons::list_seasons,
        super::seasons::get_season,
        super::seasons::list_season_episodes,
        super::seasons::create_season,
        super::seasons::update_season,
        super::seasons::delete_season,
        super::episodes::list_episodes,
        super::episodes::get_episode,
        super::episodes::create_episode,
        super::episodes::update_episode,
        super::episodes::delete_episode,
        super::channels::list_channels,
        super::channels::get_channel,
        super::channels::create_channel,
        super::channels::update_channel,
        super::channels::delete_channel,
        super::genres::list_genres,
        super::genres::get_genre,
        super::genres::create_genre,
        super::genres::update_genre,
        super::genres::delete_genre,
        super::users::list_users,
        super::users::get_user,
        super::users::get_user_by_login,
        super::users::get_user_by_email,
        super::users::create_user,
        super::users::update_user,
        super::users::delete_user,
        super::users::validate_password,
    ),
    components(schemas(
        Show,
        Season,
        Episode,
        Channel,
        Genre,
        UserProfile,
        UserDto,
        ValidatePasswordRequest,
        HealthStatus,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "shows", description = "Show catalogue"),
        (name = "seasons", description = "Seasons of a show"),
        (name = "episodes", description = "Episodes of a season"),
        (name = "channels", description = "Broadcast channels"),
        (name = "genres", description = "Genres"),
        (name = "users", description = "User profiles"),
        (name = "system", description = "Health"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme so Swagger UI can send `Authorization`.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[must_use]
pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_operations_require_bearer() {
        let doc = serde_json::to_value(openapi_spec()).unwrap();

        assert_eq!(
            doc["components"]["securitySchemes"]["bearer"]["scheme"],
            "bearer"
        );
        assert_eq!(
            doc["paths"]["/api/shows"]["post"]["security"][0]["bearer"],
            serde_json::json!([])
        );
        assert_eq!(
            doc["paths"]["/api/users"]["get"]["security"][0]["bearer"],
            serde_json::json!([])
        );
        assert!(doc["paths"]["/api/shows"]["get"].get("security").is_none());
    }
}
