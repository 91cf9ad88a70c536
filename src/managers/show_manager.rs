//! Domain service for the show catalogue: shows and their season and
//! episode listings.

use thiserror::Error;

use crate::db::StoreError;
use crate::models::{Episode, Season, Show};

/// Upper bound for [`ShowManager::top_shows`].
pub const MAX_TOP_SHOWS: u64 = 100;

#[derive(Debug, Error)]
pub enum ShowError {
    #[error("Show not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[async_trait::async_trait]
pub trait ShowManager: Send + Sync {
    async fn get_show(&self, id: &str) -> Result<Show, ShowError>;

    async fn list_shows(&self) -> Result<Vec<Show>, ShowError>;

    /// Highest rated shows, optionally filtered by a name substring.
    /// `count` is clamped to [`MAX_TOP_SHOWS`].
    async fn top_shows(&self, name: Option<&str>, count: u64) -> Result<Vec<Show>, ShowError>;

    /// Seasons referencing `show_id`. An unknown show yields an empty list.
    async fn seasons_for_show(&self, show_id: &str) -> Result<Vec<Season>, ShowError>;

    async fn episodes_for_season(&self, season_id: &str) -> Result<Vec<Episode>, ShowError>;

    async fn create_show(&self, show: Show) -> Result<Show, ShowError>;

    async fn update_show(&self, id: &str, show: Show) -> Result<Show, ShowError>;

    /// Removes the show only; its seasons stay in place.
    async fn delete_show(&self, id: &str) -> Result<(), ShowError>;
}
