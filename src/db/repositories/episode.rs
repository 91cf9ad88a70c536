use async_trait::async_trait;
use std::sync::Arc;

use crate::db::{DocumentStore, Filter, FindOptions, Repository, SortOrder, StoreError};
use crate::models::Episode;

#[derive(Clone)]
pub struct EpisodeRepository {
    store: Arc<dyn DocumentStore>,
}

impl EpisodeRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Episodes of one season, by episode number.
    pub async fn find_by_season_id(&self, season_id: &str) -> Result<Vec<Episode>, StoreError> {
        self.find_where(
            &Filter::eq(Episode::SEASON_ID, season_id),
            &FindOptions::sorted_by(Episode::NUMBER, SortOrder::Ascending),
        )
        .await
    }
}

#[async_trait]
impl Repository for EpisodeRepository {
    type Model = Episode;

    const COLLECTION: &'static str = "episodes";

    fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteDocumentStore;
    use chrono::NaiveDate;

    fn episode(id: &str, season_id: &str, number: u32) -> Episode {
        Episode {
            id: id.to_string(),
            season_id: season_id.to_string(),
            number,
            title: format!("Episode {number}"),
            air_date: NaiveDate::from_ymd_opt(2024, 1, number),
        }
    }

    #[tokio::test]
    async fn find_by_season_id_returns_exactly_the_seasons_episodes() {
        let repo = EpisodeRepository::new(Arc::new(SqliteDocumentStore::in_memory().await.unwrap()));

        repo.insert(episode("e3", "se1", 3)).await.unwrap();
        repo.insert(episode("e1", "se1", 1)).await.unwrap();
        repo.insert(episode("x1", "se2", 1)).await.unwrap();
        repo.insert(episode("e2", "se1", 2)).await.unwrap();

        let episodes = repo.find_by_season_id("se1").await.unwrap();

        assert_eq!(episodes.len(), 3);
        assert!(episodes.iter().all(|e| e.season_id == "se1"));
        assert_eq!(episodes[0], episode("e1", "se1", 1));
        assert_eq!(episodes[2].id, "e3");

        assert!(repo.find_by_season_id("missing").await.unwrap().is_empty());
    }
}
