//! In-memory identity provider

use async_trait::async_trait;
use tracing::instrument;

use flix_core::entities::Profile;
use flix_core::traits::{ProfileProvider, RepoResult};
use flix_core::value_objects::Snowflake;

use crate::store::MemoryStore;

#[derive(Clone)]
pub struct MemProfileProvider {
    store: MemoryStore,
}

impl MemProfileProvider {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProfileProvider for MemProfileProvider {
    #[instrument(skip(self))]
    async fn fetch_profile(&self, user_id: Snowflake) -> RepoResult<Option<Profile>> {
        Ok(self.store.profile(user_id))
    }
}
