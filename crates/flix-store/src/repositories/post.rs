//! In-memory implementation of PostRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, instrument};

use flix_core::entities::Post;
use flix_core::traits::{PostFilter, PostRepository, PostStream, RepoResult};
use flix_core::value_objects::{Partition, Snowflake};

use crate::faults::StoreOp;
use crate::store::MemoryStore;

#[derive(Clone)]
pub struct MemPostRepository {
    store: MemoryStore,
}

impl MemPostRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PostRepository for MemPostRepository {
    async fn server_time(&self) -> RepoResult<DateTime<Utc>> {
        Ok(self.store.now())
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn write(&self, partition: Partition, post: &Post) -> RepoResult<()> {
        self.store.check(StoreOp::Write, Some(partition))?;
        self.store.put_post(partition, post.clone());
        debug!(partition = %partition, "Post copy written");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn read(&self, partition: Partition, post_id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.store.get_post(partition, post_id))
    }

    #[instrument(skip(self))]
    async fn query(&self, partition: Partition, filter: &PostFilter) -> RepoResult<Vec<Post>> {
        Ok(self.store.snapshot(partition, filter))
    }

    #[instrument(skip(self))]
    async fn subscribe(&self, partition: Partition, filter: PostFilter) -> RepoResult<PostStream> {
        self.store.check(StoreOp::Subscribe, Some(partition))?;

        let changes = self.store.changes(partition);
        let store = self.store.clone();

        // State is None once the stream has reported an error
        let snapshots = stream::unfold(Some((changes, false)), move |state| {
            let store = store.clone();
            let filter = filter.clone();
            async move {
                let (mut changes, primed) = state?;
                if primed && changes.changed().await.is_err() {
                    return None;
                }
                match store.check(StoreOp::Subscribe, Some(partition)) {
                    Ok(()) => Some((
                        Ok(store.snapshot(partition, &filter)),
                        Some((changes, true)),
                    )),
                    Err(e) => Some((Err(e), None)),
                }
            }
        });

        Ok(snapshots.boxed())
    }

    #[instrument(skip(self))]
    async fn delete(&self, partition: Partition, post_id: Snowflake) -> RepoResult<()> {
        self.store.check(StoreOp::Delete, Some(partition))?;
        if self.store.remove_post(partition, post_id) {
            debug!(partition = %partition, "Post copy deleted");
        }
        Ok(())
    }
}
