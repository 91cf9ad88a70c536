use async_trait::async_trait;
use std::sync::Arc;

use crate::db::{DocumentStore, Filter, FindOptions, Repository, StoreError};
use crate::models::UserProfile;

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // Login and email are expected to be unique, but nothing enforces it;
    // with duplicates the lowest id wins.

    pub async fn find_by_login(&self, login: &str) -> Result<Option<UserProfile>, StoreError> {
        self.find_one(Filter::eq(UserProfile::LOGIN, login)).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StoreError> {
        self.find_one(Filter::eq(UserProfile::EMAIL, email)).await
    }

    async fn find_one(&self, filter: Filter) -> Result<Option<UserProfile>, StoreError> {
        let mut found = self
            .find_where(&filter, &FindOptions::default().limit(1))
            .await?;
        Ok(found.pop())
    }
}

#[async_trait]
impl Repository for UserRepository {
    type Model = UserProfile;

    const COLLECTION: &'static str = "users";

    fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteDocumentStore;

    fn user(id: &str, login: &str, email: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            login: login.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    async fn repo() -> UserRepository {
        UserRepository::new(Arc::new(SqliteDocumentStore::in_memory().await.unwrap()))
    }

    #[tokio::test]
    async fn lookups_return_the_single_match() {
        let repo = repo().await;
        repo.insert(user("u1", "alice", "alice@example.com")).await.unwrap();
        repo.insert(user("u2", "bob", "bob@example.com")).await.unwrap();

        let by_login = repo.find_by_login("bob").await.unwrap().unwrap();
        assert_eq!(by_login.id, "u2");

        let by_email = repo
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, "u1");
    }

    #[tokio::test]
    async fn lookups_without_match_are_none() {
        let repo = repo().await;
        repo.insert(user("u1", "alice", "alice@example.com")).await.unwrap();

        assert_eq!(repo.find_by_login("Alice").await.unwrap(), None);
        assert_eq!(repo.find_by_email("bob@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_logins_resolve_to_lowest_id() {
        let repo = repo().await;
        repo.insert(user("u2", "sam", "sam2@example.com")).await.unwrap();
        repo.insert(user("u1", "sam", "sam1@example.com")).await.unwrap();

        assert_eq!(repo.find_by_login("sam").await.unwrap().unwrap().id, "u1");
    }
}
