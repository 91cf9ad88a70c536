//! MongoDB document store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document as BsonDocument, doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Collection, Database};
use serde_json::Value;
use tracing::info;

use super::{DocumentStore, Filter, FindOptions, ID_FIELD, SortOrder, StoreError};

const MONGO_ID: &str = "_id";
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoDocumentStore {
    database: Database,
}

impl MongoDocumentStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        if database.trim().is_empty() {
            return Err(StoreError::Configuration(
                "database name is required for MongoDB".to_string(),
            ));
        }

        let client = Client::with_uri_str(uri).await?;
        info!(database, "MongoDB document store ready");

        Ok(Self {
            database: client.database(database),
        })
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.database.collection(name)
    }
}

fn field_name(field: &str) -> &str {
    if field == ID_FIELD { MONGO_ID } else { field }
}

fn to_bson(value: &Value) -> Result<Bson, StoreError> {
    bson::to_bson(value).map_err(|e| StoreError::Database(format!("BSON conversion failed: {e}")))
}

/// Documents written by older clients may carry `ObjectId` keys, so a
/// hex id matches either representation.
fn id_match(id: &str) -> Bson {
    match ObjectId::parse_str(id) {
        Ok(oid) => Bson::Document(doc! { "$in": [Bson::ObjectId(oid), Bson::String(id.to_string())] }),
        Err(_) => Bson::String(id.to_string()),
    }
}

fn id_filter(id: &str) -> BsonDocument {
    let mut filter = BsonDocument::new();
    filter.insert(MONGO_ID, id_match(id));
    filter
}

pub(crate) fn filter_to_bson(filter: &Filter) -> Result<BsonDocument, StoreError> {
    match filter {
        Filter::All => Ok(BsonDocument::new()),
        Filter::Eq { field, value } => {
            if field == ID_FIELD
                && let Value::String(id) = value
            {
                return Ok(id_filter(id));
            }
            let mut out = BsonDocument::new();
            out.insert(field_name(field), to_bson(value)?);
            Ok(out)
        }
        Filter::Contains { field, needle } => {
            let mut out = BsonDocument::new();
            out.insert(field_name(field), doc! { "$regex": regex::escape(needle) });
            Ok(out)
        }
        Filter::And(filters) => {
            if filters.is_empty() {
                return Ok(BsonDocument::new());
            }
            let clauses = filters
                .iter()
                .map(filter_to_bson)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(doc! { "$and": clauses })
        }
    }
}

fn sort_to_bson(options: &FindOptions) -> BsonDocument {
    let mut sort = BsonDocument::new();
    if let Some(s) = &options.sort {
        let direction = match s.order {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        };
        sort.insert(field_name(&s.field), direction);
    }
    if !sort.contains_key(MONGO_ID) {
        sort.insert(MONGO_ID, 1);
    }
    sort
}

pub(crate) fn to_mongo_document(id: &str, document: &Value) -> Result<BsonDocument, StoreError> {
    let mut out = bson::to_document(document)
        .map_err(|e| StoreError::Database(format!("BSON conversion failed: {e}")))?;
    out.remove(ID_FIELD);
    out.insert(MONGO_ID, id);
    Ok(out)
}

/// Replacement body for `replace_one`. It carries no `_id`, so the server
/// keeps whatever key type the matched document was stored with.
pub(crate) fn to_mongo_replacement(document: &Value) -> Result<BsonDocument, StoreError> {
    let mut out = bson::to_document(document)
        .map_err(|e| StoreError::Database(format!("BSON conversion failed: {e}")))?;
    out.remove(ID_FIELD);
    out.remove(MONGO_ID);
    Ok(out)
}

pub(crate) fn from_mongo_document(mut document: BsonDocument) -> Value {
    let id = document.remove(MONGO_ID);
    let mut value = Bson::Document(document).into_relaxed_extjson();

    if let (Some(id), Value::Object(map)) = (id, &mut value) {
        let id = match id {
            Bson::String(s) => s,
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        map.insert(ID_FIELD.to_string(), Value::String(id));
    }

    value
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Value>, StoreError> {
        // Mongo treats a zero limit as "no limit".
        if options.limit == Some(0) {
            return Ok(Vec::new());
        }

        let coll = self.collection(collection);
        let mut query = coll
            .find(filter_to_bson(filter)?)
            .sort(sort_to_bson(options));
        if let Some(limit) = options.limit {
            query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let documents: Vec<BsonDocument> = query.await?.try_collect().await?;
        Ok(documents.into_iter().map(from_mongo_document).collect())
    }

    async fn insert(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError> {
        let document = to_mongo_document(id, &document)?;

        match self.collection(collection).insert_one(document).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::duplicate(collection, id)),
            Err(err) => Err(err.into()),
        }
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<bool, StoreError> {
        let replacement = to_mongo_replacement(&document)?;
        let result = self
            .collection(collection)
            .replace_one(id_filter(id), replacement)
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = self
            .collection(collection)
            .delete_one(id_filter(id))
            .await?;

        Ok(result.deleted_count > 0)
    }
}
