use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::TokenValidator;
use crate::config::Config;
use crate::db::{
    self, ChannelRepository, DocumentStore, EpisodeRepository, GenreRepository, SeasonRepository,
    ShowRepository, UserRepository,
};
use crate::managers::{DefaultShowManager, DefaultUserManager, ShowManager, UserManager};

/// One handle per collection, built once at startup.
#[derive(Clone)]
pub struct Repositories {
    pub shows: ShowRepository,

    pub channels: ChannelRepository,

    pub genres: GenreRepository,

    pub seasons: SeasonRepository,

    pub episodes: EpisodeRepository,

    pub users: UserRepository,
}

impl Repositories {
    #[must_use]
    pub fn new(store: &Arc<dyn DocumentStore>) -> Self {
        Self {
            shows: ShowRepository::new(store.clone()),
            channels: ChannelRepository::new(store.clone()),
            genres: GenreRepository::new(store.clone()),
            seasons: SeasonRepository::new(store.clone()),
            episodes: EpisodeRepository::new(store.clone()),
            users: UserRepository::new(store.clone()),
        }
    }
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Arc<dyn DocumentStore>,

    pub repositories: Repositories,

    pub show_manager: Arc<dyn ShowManager>,

    pub user_manager: Arc<dyn UserManager>,

    pub tokens: TokenValidator,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = db::connect(&config.database).await?;
        Self::with_store(config, store)
    }

    /// Wires repositories and managers around an already opened store.
    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> anyhow::Result<Self> {
        if config.uses_development_signing_key() {
            warn!("auth.signing_key is the development default; set WATCHALL_JWT_SECRET");
        }

        let repositories = Repositories::new(&store);

        let show_manager: Arc<dyn ShowManager> = Arc::new(DefaultShowManager::new(
            repositories.shows.clone(),
            repositories.seasons.clone(),
            repositories.episodes.clone(),
        ));
        let user_manager: Arc<dyn UserManager> =
            Arc::new(DefaultUserManager::new(repositories.users.clone()));

        let tokens =
            TokenValidator::new(&config.auth).context("Invalid auth.token_lifetime_minutes")?;

        info!(backend = store.backend(), "Application state initialized");

        Ok(Self {
            config: Arc::new(config),
            store,
            repositories,
            show_manager,
            user_manager,
            tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> Config {
        let mut config = Config::default();
        config.database.connection_string = "sqlite::memory:".to_string();
        config
    }

    #[tokio::test]
    async fn builds_state_on_memory_store() {
        let state = SharedState::new(memory_config()).await.unwrap();
        assert_eq!(state.store.backend(), "sqlite");
    }

    #[tokio::test]
    async fn oversized_token_lifetime_fails_instead_of_panicking() {
        let mut config = memory_config();
        config.auth.token_lifetime_minutes = i64::MAX / 2;

        assert!(SharedState::new(config).await.is_err());
    }
}
