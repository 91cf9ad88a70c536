use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stored user profile. Leaves the process only through
/// [`crate::api::UserDto`], which drops the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,

    pub login: String,

    pub email: String,

    #[serde(default)]
    pub password_hash: String,
}

impl UserProfile {
    pub const LOGIN: &'static str = "login";
    pub const EMAIL: &'static str = "email";
}
