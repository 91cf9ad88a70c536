//! [`UserManager`] backed by the users collection.

use async_trait::async_trait;
use tracing::info;

use crate::db::{Repository, UserRepository};
use crate::managers::user_manager::{UserError, UserManager};
use crate::models::UserProfile;

pub struct DefaultUserManager {
    users: UserRepository,
}

impl DefaultUserManager {
    #[must_use]
    pub const fn new(users: UserRepository) -> Self {
        Self { users }
    }
}

fn validate_profile(profile: &UserProfile) -> Result<(), UserError> {
    if profile.login.trim().is_empty() {
        return Err(UserError::Validation("login is required".to_string()));
    }
    if profile.email.trim().is_empty() {
        return Err(UserError::Validation("email is required".to_string()));
    }
    if !profile.email.contains('@') {
        return Err(UserError::Validation(format!(
            "'{}' is not an email address",
            profile.email
        )));
    }
    Ok(())
}

#[async_trait]
impl UserManager for DefaultUserManager {
    async fn get_by_id(&self, id: &str) -> Result<UserProfile, UserError> {
        self.users
            .find(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    async fn get_by_login(&self, login: &str) -> Result<UserProfile, UserError> {
        self.users
            .find_by_login(login)
            .await?
            .ok_or_else(|| UserError::NotFound(login.to_string()))
    }

    async fn get_by_email(&self, email: &str) -> Result<UserProfile, UserError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFound(email.to_string()))
    }

    async fn get_all_users(&self) -> Result<Vec<UserProfile>, UserError> {
        Ok(self.users.select_all().await?)
    }

    async fn insert_profile(&self, profile: UserProfile) -> Result<UserProfile, UserError> {
        validate_profile(&profile)?;

        let stored = self.users.insert(profile).await?;
        info!(user_id = %stored.id, login = %stored.login, "User profile created");
        Ok(stored)
    }

    async fn update_profile(&self, profile: UserProfile) -> Result<UserProfile, UserError> {
        if profile.id.trim().is_empty() {
            return Err(UserError::Validation("id is required".to_string()));
        }
        validate_profile(&profile)?;

        let id = profile.id.clone();
        let stored = self.users.replace_by_id(&id, profile).await?;
        info!(user_id = %stored.id, "User profile updated");
        Ok(stored)
    }

    async fn delete_profile(&self, id: &str) -> Result<(), UserError> {
        if !self.users.delete_by_id(id).await? {
            return Err(UserError::NotFound(id.to_string()));
        }
        info!(user_id = %id, "User profile deleted");
        Ok(())
    }

    async fn validate_password(&self, _login: &str, _password: &str) -> Result<bool, UserError> {
        Err(UserError::NotImplemented("password validation"))
    }
}
