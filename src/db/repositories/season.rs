use async_trait::async_trait;
use std::sync::Arc;

use crate::db::{DocumentStore, Filter, FindOptions, Repository, SortOrder, StoreError};
use crate::models::Season;

#[derive(Clone)]
pub struct SeasonRepository {
    store: Arc<dyn DocumentStore>,
}

impl SeasonRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Seasons of one show, by season number.
    pub async fn find_by_show_id(&self, show_id: &str) -> Result<Vec<Season>, StoreError> {
        self.find_where(
            &Filter::eq(Season::SHOW_ID, show_id),
            &FindOptions::sorted_by(Season::NUMBER, SortOrder::Ascending),
        )
        .await
    }
}

#[async_trait]
impl Repository for SeasonRepository {
    type Model = Season;

    const COLLECTION: &'static str = "seasons";

    fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
