//! In-memory implementation of CircleRepository

use async_trait::async_trait;
use tracing::instrument;

use flix_core::entities::Circle;
use flix_core::traits::{CircleRepository, RepoResult};
use flix_core::value_objects::Snowflake;

use crate::store::MemoryStore;

#[derive(Clone)]
pub struct MemCircleRepository {
    store: MemoryStore,
}

impl MemCircleRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CircleRepository for MemCircleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Circle>> {
        Ok(self.store.circle(id))
    }

    #[instrument(skip(self))]
    async fn find_by_member(&self, user_id: Snowflake) -> RepoResult<Vec<Circle>> {
        Ok(self.store.circles_of(user_id))
    }
}
