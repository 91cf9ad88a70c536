//! Document store abstraction.
//!
//! Every repository talks to a [`DocumentStore`]: a collection-keyed store of
//! JSON documents with single-document atomic writes. Two backends exist,
//! MongoDB for deployments and a SQLite document table for local runs and tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::DatabaseConfig;

pub mod migrator;
pub mod mongo;
pub mod repositories;
pub mod sqlite;

pub use mongo::MongoDocumentStore;
pub use repositories::{
    ChannelRepository, Document, EpisodeRepository, GenreRepository, Repository,
    SeasonRepository, ShowRepository, UserRepository,
};
pub use sqlite::SqliteDocumentStore;

/// Field every document uses for its identifier.
pub const ID_FIELD: &str = "id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} document '{id}' not found")]
    NotFound { collection: String, id: String },

    #[error("{collection} document '{id}' already exists")]
    Duplicate { collection: String, id: String },

    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid store configuration: {0}")]
    Configuration(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn duplicate(collection: &str, id: &str) -> Self {
        Self::Duplicate {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Store-side predicate over top-level document fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Eq { field: String, value: Value },
    /// Case-sensitive substring match on a string field.
    Contains { field: String, needle: String },
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn contains(field: &str, needle: impl Into<String>) -> Self {
        Self::Contains {
            field: field.to_string(),
            needle: needle.into(),
        }
    }

    pub fn by_id(id: &str) -> Self {
        Self::eq(ID_FIELD, id)
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::All, f) | (f, Self::All) => f,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), f) => {
                left.push(f);
                Self::And(left)
            }
            (f, Self::And(mut right)) => {
                right.insert(0, f);
                Self::And(right)
            }
            (a, b) => Self::And(vec![a, b]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// Ordering and size limits for a find. Results are always ordered by id
/// after the explicit sort key so repeated queries are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<Sort>,
    pub limit: Option<u64>,
}

impl FindOptions {
    #[must_use]
    pub fn sorted_by(field: &str, order: SortOrder) -> Self {
        Self {
            sort: Some(Sort {
                field: field.to_string(),
                order,
            }),
            limit: None,
        }
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Collection-keyed JSON document storage.
///
/// Documents passed to and returned from the store carry their identifier in
/// the [`ID_FIELD`] field; backends map it to their native key.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Value>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the id is taken.
    async fn insert(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError>;

    /// Overwrites an existing document. Returns `false` when nothing matched;
    /// never inserts.
    async fn replace(&self, collection: &str, id: &str, document: Value)
    -> Result<bool, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
}

/// Opens the backend named by the connection string scheme.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let url = config.connection_string.trim();

    if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
        let store = MongoDocumentStore::connect(url, &config.database).await?;
        Ok(Arc::new(store))
    } else if url.starts_with("sqlite:") {
        let store = SqliteDocumentStore::with_pool_options(
            url,
            config.max_connections,
            config.min_connections,
        )
        .await?;
        Ok(Arc::new(store))
    } else {
        Err(StoreError::Configuration(format!(
            "unsupported connection string scheme: {url}"
        )))
    }
}
