use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    #[serde(default)]
    pub id: String,

    /// Parent season. Not checked against the seasons collection.
    pub season_id: String,

    pub number: u32,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_date: Option<NaiveDate>,
}

impl Episode {
    pub const SEASON_ID: &'static str = "seasonId";
    pub const NUMBER: &'static str = "number";
}
