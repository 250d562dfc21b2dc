//! Feed aggregator
//!
//! A subscription covers one or more partitions: `Home` is the global
//! partition restricted to `Everyone` posts plus the partition of every
//! circle the viewer belongs to, `Circle` is a single circle's partition.
//! Each subscription runs as its own task and publishes deduplicated,
//! newest-first snapshots with author profiles and reaction counts.

mod snapshot;
mod subscription;
mod worker;

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, info_span, instrument, Instrument};
use uuid::Uuid;

use flix_core::{validity_window, DomainError, Partition, PostFilter, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub use snapshot::{FeedEntry, FeedSnapshot};
pub use subscription::{FeedState, FeedSubscription};

use worker::FeedWorker;

/// Which feed a viewer is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FeedScope {
    Home,
    Circle(Snowflake),
}

pub struct FeedAggregator<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FeedAggregator<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open a live feed.
    ///
    /// Circle membership is read once, here. A `Circle` scope the viewer is
    /// not a member of fails with `NotCircleMember`. Whether the viewer may
    /// see feeds at all is the caller's decision through `GateKeeper`.
    #[instrument(skip(self))]
    pub async fn subscribe(
        &self,
        viewer_id: Snowflake,
        scope: FeedScope,
    ) -> ServiceResult<FeedSubscription> {
        let constituents = self.constituents(viewer_id, scope).await?;
        let partitions = constituents.len();

        let id = Uuid::new_v4();
        let (sender, receiver) = watch::channel(FeedState::Initializing);
        let publisher = Arc::new(Mutex::new(Some(sender)));

        let worker = FeedWorker::new(self.ctx.clone(), constituents, Arc::clone(&publisher));
        let span = info_span!("feed", subscription_id = %id, viewer_id = %viewer_id);
        let task = tokio::spawn(worker.run().instrument(span));

        info!(subscription_id = %id, partitions, "Feed subscription opened");

        Ok(FeedSubscription::new(
            id, viewer_id, scope, publisher, receiver, task,
        ))
    }

    async fn constituents(
        &self,
        viewer_id: Snowflake,
        scope: FeedScope,
    ) -> ServiceResult<Vec<(Partition, PostFilter)>> {
        let now = self.ctx.post_repo().server_time().await?;
        let window = PostFilter::since(now - validity_window());

        match scope {
            FeedScope::Home => {
                let circles = self.ctx.circle_repo().find_by_member(viewer_id).await?;
                Ok(std::iter::once((Partition::Global, window.clone().everyone_only()))
                    .chain(
                        circles
                            .into_iter()
                            .map(|circle| (Partition::Circle(circle.id), window.clone())),
                    )
                    .collect())
            }
            FeedScope::Circle(circle_id) => {
                let circle = self
                    .ctx
                    .circle_repo()
                    .find_by_id(circle_id)
                    .await?
                    .ok_or(DomainError::CircleNotFound(circle_id))?;
                if !circle.is_member(viewer_id) {
                    return Err(DomainError::NotCircleMember(circle_id).into());
                }
                Ok(vec![(Partition::Circle(circle_id), window)])
            }
        }
    }
}
