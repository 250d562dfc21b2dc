//! Task behind a feed subscription
//!
//! Merges the partition streams with a refresh timer. Every change or tick
//! starts a new evaluation and drops the one in flight, so published
//! snapshots only move forward.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, OptionFuture};
use futures::stream::{self, StreamExt};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use flix_core::{Partition, Post, PostFilter};

use super::snapshot::{evaluate, FeedSnapshot};
use super::subscription::{FeedState, Publisher};
use crate::services::context::ServiceContext;
use crate::services::error::ServiceResult;

pub(crate) struct FeedWorker {
    ctx: ServiceContext,
    constituents: Vec<(Partition, PostFilter)>,
    publisher: Publisher,
}

impl FeedWorker {
    pub(crate) fn new(
        ctx: ServiceContext,
        constituents: Vec<(Partition, PostFilter)>,
        publisher: Publisher,
    ) -> Self {
        Self {
            ctx,
            constituents,
            publisher,
        }
    }

    pub(crate) async fn run(self) {
        let mut streams = Vec::with_capacity(self.constituents.len());
        for (index, (partition, filter)) in self.constituents.iter().enumerate() {
            match self.ctx.post_repo().subscribe(*partition, filter.clone()).await {
                Ok(stream) => streams.push(stream.map(move |item| (index, item))),
                Err(e) => {
                    self.fail(format!("partition {partition}: {e}"));
                    return;
                }
            }
        }
        debug!(partitions = streams.len(), "Partition streams open");

        let mut merged = stream::select_all(streams);
        let mut latest: Vec<Option<Vec<Post>>> = vec![None; self.constituents.len()];

        let period = self.ctx.feed_config().refresh_interval();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut generation = 0u64;
        let mut stale = false;
        let mut pending: Option<BoxFuture<'static, ServiceResult<FeedSnapshot>>> = None;

        loop {
            tokio::select! {
                item = merged.next() => match item {
                    Some((index, Ok(posts))) => {
                        trace!(partition = %self.constituents[index].0, posts = posts.len(), "Partition changed");
                        latest[index] = Some(posts);
                        stale = true;
                    }
                    Some((index, Err(e))) => {
                        self.fail(format!("partition {}: {e}", self.constituents[index].0));
                        return;
                    }
                    None => {
                        self.fail("partition streams ended".to_string());
                        return;
                    }
                },
                _ = ticker.tick() => {
                    trace!("Refresh tick");
                    stale = true;
                }
                Some(result) = OptionFuture::from(pending.as_mut()), if pending.is_some() => {
                    pending = None;
                    match result {
                        Ok(snapshot) => self.publish(snapshot),
                        Err(e) => {
                            self.fail(format!("evaluation failed: {e}"));
                            return;
                        }
                    }
                }
            }

            if stale && latest.iter().all(Option::is_some) {
                stale = false;
                generation += 1;
                if pending.is_some() {
                    trace!(generation, "Superseding evaluation in flight");
                }
                let partitions = latest.iter().flatten().cloned().collect();
                pending = Some(evaluate(self.ctx.clone(), generation, partitions).boxed());
            }
        }
    }

    fn publish(&self, snapshot: FeedSnapshot) {
        let guard = self.publisher.lock();
        if let Some(sender) = guard.as_ref() {
            trace!(generation = snapshot.generation, entries = snapshot.len(), "Publishing snapshot");
            sender.send_replace(FeedState::Streaming(Arc::new(snapshot)));
        }
    }

    fn fail(&self, reason: String) {
        warn!(reason = %reason, "Feed subscription failed");
        let guard = self.publisher.lock();
        if let Some(sender) = guard.as_ref() {
            sender.send_replace(FeedState::Failed(reason));
        }
    }
}
