use async_trait::async_trait;
use std::sync::Arc;

use crate::db::{DocumentStore, Repository};
use crate::models::Channel;

#[derive(Clone)]
pub struct ChannelRepository {
    store: Arc<dyn DocumentStore>,
}

impl ChannelRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Repository for ChannelRepository {
    type Model = Channel;

    // Existing deployments keep channels under this spelling.
    const COLLECTION: &'static str = "chanels";

    fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
