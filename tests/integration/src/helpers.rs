//! Test helpers for integration tests
//!
//! Provides an engine over a fresh in-memory store and utilities for
//! reading live feeds with a bound on how long a test may wait.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeDelta, Utc};
use flix_common::{try_init_tracing, AppConfig};
use flix_core::{Audience, Partition, Post, Snowflake};
use flix_service::{
    FeedAggregator, FeedScope, FeedSnapshot, FeedSubscription, PostStore, ServiceContext,
};
use flix_store::{
    MemCircleRepository, MemPostRepository, MemProfileProvider, MemReactionRepository,
    MemoryStore, ServerClock,
};

use crate::fixtures::{images, t0};

/// How long a test waits for a feed snapshot
pub const SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default test configuration
pub fn test_config() -> AppConfig {
    AppConfig::default()
}

/// Install a subscriber once for the whole test binary
pub fn init_test_tracing() {
    let _ = try_init_tracing();
}

/// Services wired to a fresh store on a manual clock starting at `t0`
pub struct TestEngine {
    pub store: MemoryStore,
    pub ctx: ServiceContext,
}

impl TestEngine {
    pub fn start() -> Result<Self> {
        Self::start_with_config(&test_config())
    }

    pub fn start_with_config(config: &AppConfig) -> Result<Self> {
        init_test_tracing();
        let store = MemoryStore::with_clock(ServerClock::manual(t0()));
        let ctx = ServiceContext::builder()
            .post_repo(Arc::new(MemPostRepository::new(store.clone())))
            .reaction_repo(Arc::new(MemReactionRepository::new(store.clone())))
            .circle_repo(Arc::new(MemCircleRepository::new(store.clone())))
            .profile_provider(Arc::new(MemProfileProvider::new(store.clone())))
            .config(config)
            .build()?;
        Ok(Self { store, ctx })
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.store.now()
    }

    /// Move the store clock
    pub fn advance(&self, delta: TimeDelta) {
        self.store.clock().advance(delta);
    }

    /// Create a one-image post directly through the fan-out writer
    pub async fn post(&self, author: Snowflake, audience: Audience) -> Result<Snowflake> {
        Ok(PostStore::new(&self.ctx)
            .create(author, images(1), None, audience)
            .await?)
    }

    pub async fn subscribe(&self, viewer: Snowflake, scope: FeedScope) -> Result<FeedSubscription> {
        Ok(FeedAggregator::new(&self.ctx).subscribe(viewer, scope).await?)
    }

    pub async fn read_copy(&self, partition: Partition, post_id: Snowflake) -> Result<Option<Post>> {
        Ok(self.ctx.post_repo().read(partition, post_id).await?)
    }
}

/// Next snapshot from a feed, failing the test on error, close or timeout
pub async fn next_snapshot(feed: &mut FeedSubscription) -> Result<Arc<FeedSnapshot>> {
    match tokio::time::timeout(SNAPSHOT_TIMEOUT, feed.next()).await {
        Ok(Some(Ok(snapshot))) => Ok(snapshot),
        Ok(Some(Err(e))) => Err(e.into()),
        Ok(None) => Err(anyhow!("feed closed")),
        Err(_) => Err(anyhow!("no snapshot within {SNAPSHOT_TIMEOUT:?}")),
    }
}

/// Read snapshots until one satisfies `predicate`
pub async fn wait_for<F>(feed: &mut FeedSubscription, predicate: F) -> Result<Arc<FeedSnapshot>>
where
    F: Fn(&FeedSnapshot) -> bool,
{
    loop {
        let snapshot = next_snapshot(feed).await?;
        if predicate(&snapshot) {
            return Ok(snapshot);
        }
    }
}
