//! SQLite-backed document store.
//!
//! All collections share one `documents` table keyed by `(collection, id)`;
//! the document itself is a JSON column queried with `json_extract`.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbBackend, EntityTrait, QueryFilter, SqlErr, Statement,
};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use super::migrator::Migrator;
use super::{DocumentStore, Filter, FindOptions, ID_FIELD, SortOrder, StoreError};
use crate::entities::documents;

#[derive(Clone)]
pub struct SqliteDocumentStore {
    conn: DatabaseConnection,
}

impl SqliteDocumentStore {
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::with_pool_options("sqlite::memory:", 1, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let in_memory = db_url.contains(":memory:");

        let mut opt = ConnectOptions::new(db_url.to_string());
        if in_memory {
            // The database only lives as long as this single connection.
            opt.max_connections(1).min_connections(1);
        } else {
            ensure_database_file(db_url).await?;
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .connect_timeout(Duration::from_secs(10))
                .acquire_timeout(Duration::from_secs(10))
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }
        opt.sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        Migrator::up(&conn, None).await?;

        info!(
            "SQLite document store ready (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }
}

async fn ensure_database_file(db_url: &str) -> Result<(), StoreError> {
    let path_str = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path_str = path_str.split('?').next().unwrap_or(path_str);
    let path = Path::new(path_str);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::Configuration(format!("{}: {e}", parent.display())))?;
    }

    if !path.exists() {
        tokio::fs::File::create(path)
            .await
            .map_err(|e| StoreError::Configuration(format!("{}: {e}", path.display())))?;
    }

    Ok(())
}

fn json_path(field: &str) -> sea_orm::Value {
    format!("$.{field}").into()
}

/// Appends the SQL predicate for `filter` and its bound values.
fn compile_filter(filter: &Filter, sql: &mut String, values: &mut Vec<sea_orm::Value>) {
    match filter {
        Filter::All => sql.push_str("1 = 1"),
        Filter::Eq { field, value } => {
            let column = if field == ID_FIELD {
                "id".to_string()
            } else {
                values.push(json_path(field));
                "json_extract(body, ?)".to_string()
            };

            match value {
                Value::Null => sql.push_str(&format!("{column} IS NULL")),
                Value::Bool(b) => {
                    sql.push_str(&format!("{column} = ?"));
                    values.push(i64::from(*b).into());
                }
                Value::Number(n) => {
                    sql.push_str(&format!("{column} = ?"));
                    if let Some(i) = n.as_i64() {
                        values.push(i.into());
                    } else {
                        values.push(n.as_f64().unwrap_or(f64::NAN).into());
                    }
                }
                Value::String(s) => {
                    sql.push_str(&format!("{column} = ?"));
                    values.push(s.clone().into());
                }
                Value::Array(_) | Value::Object(_) => {
                    sql.push_str(&format!("{column} = json(?)"));
                    values.push(value.to_string().into());
                }
            }
        }
        Filter::Contains { field, needle } => {
            sql.push_str("instr(json_extract(body, ?), ?) > 0");
            values.push(json_path(field));
            values.push(needle.clone().into());
        }
        Filter::And(filters) => {
            if filters.is_empty() {
                sql.push_str("1 = 1");
                return;
            }
            for (i, f) in filters.iter().enumerate() {
                if i > 0 {
                    sql.push_str(" AND ");
                }
                sql.push('(');
                compile_filter(f, sql, values);
                sql.push(')');
            }
        }
    }
}

fn build_find(collection: &str, filter: &Filter, options: &FindOptions) -> Statement {
    let mut sql = String::from("SELECT body FROM documents WHERE collection = ? AND (");
    let mut values: Vec<sea_orm::Value> = vec![collection.into()];

    compile_filter(filter, &mut sql, &mut values);
    sql.push_str(") ORDER BY ");

    if let Some(sort) = &options.sort {
        let direction = match sort.order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };
        if sort.field == ID_FIELD {
            sql.push_str(&format!("id {direction}"));
        } else {
            sql.push_str(&format!("json_extract(body, ?) {direction}, id ASC"));
            values.push(json_path(&sort.field));
        }
    } else {
        sql.push_str("id ASC");
    }

    if let Some(limit) = options.limit {
        sql.push_str(" LIMIT ?");
        values.push(i64::try_from(limit).unwrap_or(i64::MAX).into());
    }

    Statement::from_sql_and_values(DbBackend::Sqlite, sql, values)
}

fn with_id(mut document: Value, id: &str) -> Value {
    if let Value::Object(map) = &mut document {
        map.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    }
    document
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Value>, StoreError> {
        let rows = self
            .conn
            .query_all(build_find(collection, filter, options))
            .await?;

        rows.into_iter()
            .map(|row| -> Result<Value, StoreError> {
                let body: String = row.try_get("", "body")?;
                Ok(serde_json::from_str(&body)?)
            })
            .collect()
    }

    async fn insert(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError> {
        let body = serde_json::to_string(&with_id(document, id))?;

        let model = documents::ActiveModel {
            collection: Set(collection.to_string()),
            id: Set(id.to_string()),
            body: Set(body),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        match documents::Entity::insert(model)
            .exec_without_returning(&self.conn)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(StoreError::duplicate(collection, id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<bool, StoreError> {
        let body = serde_json::to_string(&with_id(document, id))?;

        let result = documents::Entity::update_many()
            .col_expr(documents::Column::Body, Expr::value(body))
            .col_expr(
                documents::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(documents::Column::Collection.eq(collection))
            .filter(documents::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = documents::Entity::delete_by_id((collection.to_string(), id.to_string()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_equality_and_substring_query() {
        let filter = Filter::eq("showId", "s1").and(Filter::contains("name", "Foo"));
        let options = FindOptions::sorted_by("rating", SortOrder::Descending).limit(5);

        let statement = build_find("shows", &filter, &options);

        assert_eq!(
            statement.sql,
            "SELECT body FROM documents WHERE collection = ? AND ((json_extract(body, ?) = ?) \
             AND (instr(json_extract(body, ?), ?) > 0)) ORDER BY json_extract(body, ?) DESC, \
             id ASC LIMIT ?"
        );
        assert_eq!(statement.values.map(|v| v.0.len()), Some(7));
    }

    #[test]
    fn id_filter_uses_key_column() {
        let statement = build_find("users", &Filter::by_id("u1"), &FindOptions::default());
        assert_eq!(
            statement.sql,
            "SELECT body FROM documents WHERE collection = ? AND (id = ?) ORDER BY id ASC"
        );
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = SqliteDocumentStore::in_memory().await.unwrap();

        store
            .insert("genres", "g1", json!({ "name": "Drama" }))
            .await
            .unwrap();
        store
            .insert("chanels", "g1", json!({ "name": "HBO" }))
            .await
            .unwrap();

        let genres = store
            .find("genres", &Filter::All, &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(genres, vec![json!({ "id": "g1", "name": "Drama" })]);

        assert!(store.delete("genres", "g1").await.unwrap());
        let channels = store
            .find("chanels", &Filter::by_id("g1"), &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(channels.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_insert_is_reported() {
        let store = SqliteDocumentStore::in_memory().await.unwrap();
        store.insert("shows", "s1", json!({})).await.unwrap();

        let err = store.insert("shows", "s1", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn replace_never_inserts() {
        let store = SqliteDocumentStore::in_memory().await.unwrap();

        let replaced = store
            .replace("shows", "missing", json!({ "name": "Ghost" }))
            .await
            .unwrap();
        assert!(!replaced);

        let all = store
            .find("shows", &Filter::All, &FindOptions::default())
            .await
            .unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn numeric_and_boolean_equality() {
        let store = SqliteDocumentStore::in_memory().await.unwrap();
        store
            .insert("seasons", "a", json!({ "number": 1, "special": true }))
            .await
            .unwrap();
        store
            .insert("seasons", "b", json!({ "number": 2, "special": false }))
            .await
            .unwrap();

        let by_number = store
            .find("seasons", &Filter::eq("number", 2), &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(by_number[0]["id"], "b");

        let specials = store
            .find("seasons", &Filter::eq("special", true), &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(specials.len(), 1);
        assert_eq!(specials[0]["id"], "a");
    }
}
