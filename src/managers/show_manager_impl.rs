//! [`ShowManager`] over the show, season and episode repositories.

use async_trait::async_trait;
use tracing::info;

use crate::db::{EpisodeRepository, Repository, SeasonRepository, ShowRepository, StoreError};
use crate::managers::show_manager::{MAX_TOP_SHOWS, ShowError, ShowManager};
use crate::models::{Episode, Season, Show};

pub struct DefaultShowManager {
    shows: ShowRepository,
    seasons: SeasonRepository,
    episodes: EpisodeRepository,
}

impl DefaultShowManager {
    #[must_use]
    pub const fn new(
        shows: ShowRepository,
        seasons: SeasonRepository,
        episodes: EpisodeRepository,
    ) -> Self {
        Self {
            shows,
            seasons,
            episodes,
        }
    }
}

fn validate_show(show: &Show) -> Result<(), ShowError> {
    if show.name.trim().is_empty() {
        return Err(ShowError::Validation("name is required".to_string()));
    }
    if !show.rating.is_finite() {
        return Err(ShowError::Validation("rating must be a number".to_string()));
    }
    Ok(())
}

#[async_trait]
impl ShowManager for DefaultShowManager {
    async fn get_show(&self, id: &str) -> Result<Show, ShowError> {
        self.shows
            .find(id)
            .await?
            .ok_or_else(|| ShowError::NotFound(id.to_string()))
    }

    async fn list_shows(&self) -> Result<Vec<Show>, ShowError> {
        Ok(self.shows.select_all().await?)
    }

    async fn top_shows(&self, name: Option<&str>, count: u64) -> Result<Vec<Show>, ShowError> {
        Ok(self
            .shows
            .get_filtered(name, count.min(MAX_TOP_SHOWS))
            .await?)
    }

    async fn seasons_for_show(&self, show_id: &str) -> Result<Vec<Season>, ShowError> {
        Ok(self.seasons.find_by_show_id(show_id).await?)
    }

    async fn episodes_for_season(&self, season_id: &str) -> Result<Vec<Episode>, ShowError> {
        Ok(self.episodes.find_by_season_id(season_id).await?)
    }

    async fn create_show(&self, show: Show) -> Result<Show, ShowError> {
        validate_show(&show)?;

        let stored = self.shows.insert(show).await?;
        info!(show_id = %stored.id, name = %stored.name, "Show created");
        Ok(stored)
    }

    async fn update_show(&self, id: &str, show: Show) -> Result<Show, ShowError> {
        validate_show(&show)?;

        match self.shows.replace_by_id(id, show).await {
            Ok(stored) => {
                info!(show_id = %id, "Show updated");
                Ok(stored)
            }
            Err(StoreError::NotFound { .. }) => Err(ShowError::NotFound(id.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_show(&self, id: &str) -> Result<(), ShowError> {
        if !self.shows.delete_by_id(id).await? {
            return Err(ShowError::NotFound(id.to_string()));
        }
        info!(show_id = %id, "Show deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DocumentStore, SqliteDocumentStore};
    use std::sync::Arc;

    struct Fixture {
        manager: DefaultShowManager,
        seasons: SeasonRepository,
        episodes: EpisodeRepository,
    }

    async fn fixture() -> Fixture {
        let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::in_memory().await.unwrap());
        let seasons = SeasonRepository::new(store.clone());
        let episodes = EpisodeRepository::new(store.clone());
        Fixture {
            manager: DefaultShowManager::new(
                ShowRepository::new(store),
                seasons.clone(),
                episodes.clone(),
            ),
            seasons,
            episodes,
        }
    }

    fn show(id: &str, name: &str, rating: f64) -> Show {
        Show {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            rating,
            channel_id: None,
            genre_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_and_get_show() {
        let f = fixture().await;

        let stored = f.manager.create_show(show("", "Foo", 7.0)).await.unwrap();

        assert_eq!(f.manager.get_show(&stored.id).await.unwrap(), stored);
        assert_eq!(f.manager.list_shows().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let f = fixture().await;
        assert!(matches!(
            f.manager.create_show(show("", " ", 1.0)).await,
            Err(ShowError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn top_shows_is_clamped() {
        let f = fixture().await;
        for i in 0..105 {
            f.manager
                .create_show(show(&format!("s{i:03}"), "Show", f64::from(i)))
                .await
                .unwrap();
        }

        let top = f.manager.top_shows(None, 1_000).await.unwrap();

        assert_eq!(top.len(), 100);
        assert_eq!(top[0].id, "s104");
    }

    #[tokio::test]
    async fn update_and_delete_unknown_show_are_not_found() {
        let f = fixture().await;

        assert!(matches!(
            f.manager.update_show("nope", show("nope", "Foo", 1.0)).await,
            Err(ShowError::NotFound(_))
        ));
        assert!(matches!(
            f.manager.delete_show("nope").await,
            Err(ShowError::NotFound(_))
        ));
        assert!(matches!(
            f.manager.get_show("nope").await,
            Err(ShowError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn deleting_a_show_keeps_its_seasons() {
        let f = fixture().await;
        f.manager.create_show(show("s1", "Foo", 8.0)).await.unwrap();
        f.seasons
            .insert(Season {
                id: "se1".to_string(),
                show_id: "s1".to_string(),
                number: 1,
                name: None,
            })
            .await
            .unwrap();

        f.manager.delete_show("s1").await.unwrap();

        let orphans = f.manager.seasons_for_show("s1").await.unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, "se1");
    }

    #[tokio::test]
    async fn episodes_for_season_lists_children() {
        let f = fixture().await;
        for (id, number) in [("e2", 2), ("e1", 1)] {
            f.episodes
                .insert(Episode {
                    id: id.to_string(),
                    season_id: "se1".to_string(),
                    number,
                    title: id.to_uppercase(),
                    air_date: None,
                })
                .await
                .unwrap();
        }

        let episodes = f.manager.episodes_for_season("se1").await.unwrap();
        let ids: Vec<&str> = episodes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["e1", "e2"]);
        assert!(f.manager.episodes_for_season("se2").await.unwrap().is_empty());
    }
}
