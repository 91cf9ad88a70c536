use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::UserProfile;

/// Envelope every JSON endpoint responds with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// User profile as exposed over HTTP. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub login: String,
    pub email: String,
}

impl From<UserProfile> for UserDto {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            login: profile.login,
            email: profile.email,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopShowsQuery {
    /// Case-sensitive substring of the show name.
    pub name: Option<String>,

    /// Number of shows to return (default 10, at most 100).
    pub count: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidatePasswordRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub backend: String,
    pub version: String,
    pub uptime: u64,
}
