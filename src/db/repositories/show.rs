use async_trait::async_trait;
use std::sync::Arc;

use crate::db::{DocumentStore, Filter, FindOptions, Repository, SortOrder, StoreError};
use crate::models::Show;

#[derive(Clone)]
pub struct ShowRepository {
    store: Arc<dyn DocumentStore>,
}

impl ShowRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Top `count` shows by rating, optionally restricted to names containing
    /// `name` (case-sensitive). An empty name means no restriction.
    pub async fn get_filtered(
        &self,
        name: Option<&str>,
        count: u64,
    ) -> Result<Vec<Show>, StoreError> {
        let filter = match name.map(str::trim) {
            Some(name) if !name.is_empty() => Filter::contains(Show::NAME, name),
            _ => Filter::All,
        };

        self.find_where(
            &filter,
            &FindOptions::sorted_by(Show::RATING, SortOrder::Descending).limit(count),
        )
        .await
    }
}

#[async_trait]
impl Repository for ShowRepository {
    type Model = Show;

    const COLLECTION: &'static str = "shows";

    fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
