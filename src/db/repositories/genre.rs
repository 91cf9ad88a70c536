use async_trait::async_trait;
use std::sync::Arc;

use crate::db::{DocumentStore, Repository};
use crate::models::Genre;

#[derive(Clone)]
pub struct GenreRepository {
    store: Arc<dyn DocumentStore>,
}

impl GenreRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Repository for GenreRepository {
    type Model = Genre;

    const COLLECTION: &'static str = "genres";

    fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
