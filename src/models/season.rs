use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    #[serde(default)]
    pub id: String,

    /// Parent show. Not checked against the shows collection.
    pub show_id: String,

    pub number: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Season {
    pub const SHOW_ID: &'static str = "showId";
    pub const NUMBER: &'static str = "number";
}
