//! Lifecycle reaper - explicit post deletion
//!
//! Expired posts are never swept; the read paths filter them out. Deletion
//! removes circle copies and the ledger first and the canonical copy last,
//! so a partly failed delete always leaves the canonical copy to retry from.

use futures::future::join_all;
use tracing::{info, instrument, warn};

use flix_core::{DomainError, Partition, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct LifecycleReaper<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LifecycleReaper<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Delete a post with every copy and its reaction ledger.
    ///
    /// Only the author may delete. On partial failure the error names every
    /// partition still holding a copy; calling again finishes the job.
    #[instrument(skip(self))]
    pub async fn delete(&self, requester_id: Snowflake, post_id: Snowflake) -> ServiceResult<()> {
        let post = self
            .ctx
            .post_repo()
            .read(Partition::Global, post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        if post.author_id != requester_id {
            return Err(DomainError::Forbidden.into());
        }

        let repo = self.ctx.post_repo();
        let deletes = post.audience.fanout_partitions().into_iter().map(|partition| async move {
            (partition, repo.delete(partition, post_id).await)
        });

        let mut surviving = Vec::new();
        for (partition, result) in join_all(deletes).await {
            if let Err(e) = result {
                warn!(post_id = %post_id, partition = %partition, error = %e, "Copy delete failed");
                surviving.push(partition);
            }
        }

        let ledger = self.ctx.reaction_repo().delete_ledger(post_id).await;
        if let Err(e) = &ledger {
            warn!(post_id = %post_id, error = %e, "Ledger delete failed");
        }

        if surviving.is_empty() && ledger.is_ok() {
            if let Err(e) = repo.delete(Partition::Global, post_id).await {
                warn!(post_id = %post_id, error = %e, "Canonical delete failed");
                surviving.push(Partition::Global);
            }
        } else {
            surviving.insert(0, Partition::Global);
        }

        if !surviving.is_empty() {
            return Err(DomainError::PartialDeleteFailure { post_id, surviving }.into());
        }

        info!(post_id = %post_id, "Post deleted");
        Ok(())
    }
}
