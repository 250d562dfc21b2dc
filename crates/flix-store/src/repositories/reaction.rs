//! In-memory implementation of ReactionRepository

use async_trait::async_trait;
use tracing::instrument;

use flix_core::entities::Reaction;
use flix_core::error::DomainError;
use flix_core::traits::{ReactionRepository, RepoResult};
use flix_core::value_objects::Snowflake;

use crate::faults::StoreOp;
use crate::store::MemoryStore;

#[derive(Clone)]
pub struct MemReactionRepository {
    store: MemoryStore,
}

impl MemReactionRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReactionRepository for MemReactionRepository {
    #[instrument(skip(self))]
    async fn create_ledger(&self, post_id: Snowflake) -> RepoResult<()> {
        self.store.check(StoreOp::LedgerCreate, None)?;
        self.store.ledger_create(post_id);
        Ok(())
    }

    #[instrument(skip(self, reaction), fields(post_id = %reaction.post_id))]
    async fn append(&self, reaction: &Reaction) -> RepoResult<()> {
        if self.store.ledger_append(reaction.clone()) {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(reaction.post_id))
        }
    }

    #[instrument(skip(self))]
    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<Reaction>> {
        Ok(self.store.ledger_entries(post_id))
    }

    #[instrument(skip(self))]
    async fn delete_ledger(&self, post_id: Snowflake) -> RepoResult<()> {
        self.store.check(StoreOp::LedgerDelete, None)?;
        self.store.ledger_remove(post_id);
        Ok(())
    }
}
