//! Generic repository over one named collection.
//!
//! A concrete repository supplies its model type, its collection name and a
//! store handle; `find`, `select_all`, `insert`, `replace_by_id` and
//! `delete_by_id` come from the trait. Specialized queries are built on
//! [`Repository::find_where`] so they always run as store-side filters.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use uuid::Uuid;

use super::{DocumentStore, Filter, FindOptions, ID_FIELD, SortOrder, StoreError};

pub mod channel;
pub mod episode;
pub mod genre;
pub mod season;
pub mod show;
pub mod user;

pub use channel::ChannelRepository;
pub use episode::EpisodeRepository;
pub use genre::GenreRepository;
pub use season::SeasonRepository;
pub use show::ShowRepository;
pub use user::UserRepository;

/// A model persisted as one document.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

#[async_trait]
pub trait Repository: Send + Sync {
    type Model: Document;

    /// Collection this repository owns.
    const COLLECTION: &'static str;

    fn store(&self) -> &dyn DocumentStore;

    async fn find(&self, id: &str) -> Result<Option<Self::Model>, StoreError> {
        let mut found = self
            .find_where(&Filter::by_id(id), &FindOptions::default().limit(1))
            .await?;
        Ok(found.pop())
    }

    /// Full scan ordered by id.
    async fn select_all(&self) -> Result<Vec<Self::Model>, StoreError> {
        self.find_where(
            &Filter::All,
            &FindOptions::sorted_by(ID_FIELD, SortOrder::Ascending),
        )
        .await
    }

    /// Stores a new document, assigning a UUID when the id is empty.
    async fn insert(&self, mut document: Self::Model) -> Result<Self::Model, StoreError> {
        if document.id().is_empty() {
            document.set_id(Uuid::new_v4().to_string());
        }

        let body = serde_json::to_value(&document)?;
        self.store()
            .insert(Self::COLLECTION, document.id(), body)
            .await?;

        debug!(collection = Self::COLLECTION, id = document.id(), "Inserted document");
        Ok(document)
    }

    /// Overwrites the whole document. The stored copy always keeps `id`;
    /// a missing document is [`StoreError::NotFound`], never an upsert.
    async fn replace_by_id(
        &self,
        id: &str,
        mut document: Self::Model,
    ) -> Result<Self::Model, StoreError> {
        document.set_id(id.to_string());

        let body = serde_json::to_value(&document)?;
        if !self.store().replace(Self::COLLECTION, id, body).await? {
            return Err(StoreError::not_found(Self::COLLECTION, id));
        }

        debug!(collection = Self::COLLECTION, id, "Replaced document");
        Ok(document)
    }

    /// Returns whether a document was actually removed.
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.store().delete(Self::COLLECTION, id).await?;
        if removed {
            debug!(collection = Self::COLLECTION, id, "Deleted document");
        }
        Ok(removed)
    }

    async fn find_where(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Self::Model>, StoreError> {
        self.store()
            .find(Self::COLLECTION, filter, options)
            .await?
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(StoreError::from))
            .collect()
    }
}
