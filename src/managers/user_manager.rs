//! Domain service for user profiles.
//!
//! Lookups by id, login and email plus profile maintenance. Password checks
//! are part of the contract but have no backing algorithm yet.

use thiserror::Error;

use crate::db::StoreError;
use crate::models::UserProfile;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[async_trait::async_trait]
pub trait UserManager: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<UserProfile, UserError>;

    async fn get_by_login(&self, login: &str) -> Result<UserProfile, UserError>;

    async fn get_by_email(&self, email: &str) -> Result<UserProfile, UserError>;

    async fn get_all_users(&self) -> Result<Vec<UserProfile>, UserError>;

    /// Stores a new profile and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Validation`] when login or email is unusable.
    async fn insert_profile(&self, profile: UserProfile) -> Result<UserProfile, UserError>;

    /// Replaces the profile stored under `profile.id`.
    async fn update_profile(&self, profile: UserProfile) -> Result<UserProfile, UserError>;

    async fn delete_profile(&self, id: &str) -> Result<(), UserError>;

    /// Always fails with [`UserError::NotImplemented`].
    async fn validate_password(&self, login: &str, password: &str) -> Result<bool, UserError>;
}
