//! Feed snapshots and the merge that produces them

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{trace, warn};

use flix_core::{Post, Profile, ReactionSummary, Snowflake};

use crate::services::context::ServiceContext;
use crate::services::error::ServiceResult;

/// One rendered post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    pub post: Post,
    pub author: Profile,
    pub reactions: ReactionSummary,
}

/// Full feed as of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    /// Strictly increasing per subscription
    pub generation: u64,
    pub evaluated_at: DateTime<Utc>,
    /// Newest first
    pub entries: Vec<FeedEntry>,
}

impl FeedSnapshot {
    pub fn post_ids(&self) -> Vec<Snowflake> {
        self.entries.iter().map(|e| e.post.id).collect()
    }

    pub fn get(&self, post_id: Snowflake) -> Option<&FeedEntry> {
        self.entries.iter().find(|e| e.post.id == post_id)
    }

    pub fn contains(&self, post_id: Snowflake) -> bool {
        self.get(post_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Union of partition snapshots: one post per id, valid at `now`, newest
/// first with ties broken by id (descending)
pub(crate) fn merge_visible<I>(partitions: I, now: DateTime<Utc>) -> Vec<Post>
where
    I: IntoIterator<Item = Vec<Post>>,
{
    let mut by_id: HashMap<Snowflake, Post> = HashMap::new();
    for post in partitions.into_iter().flatten() {
        if post.is_valid(now) {
            by_id.entry(post.id).or_insert(post);
        }
    }

    let mut posts: Vec<_> = by_id.into_values().collect();
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    posts
}

/// Build a snapshot from the latest partition contents.
///
/// Authors the identity provider fails on render as placeholders; a failed
/// ledger read fails the evaluation.
pub(crate) async fn evaluate(
    ctx: ServiceContext,
    generation: u64,
    partitions: Vec<Vec<Post>>,
) -> ServiceResult<FeedSnapshot> {
    let now = ctx.post_repo().server_time().await?;
    let posts = merge_visible(partitions, now);

    let authors: HashMap<Snowflake, Profile> = ctx
        .profile_cache()
        .resolve_many(posts.iter().map(|p| p.author_id))
        .await
        .into_iter()
        .map(|(user_id, result)| {
            let profile = result.unwrap_or_else(|e| {
                warn!(user_id = %user_id, error = %e, "Profile lookup failed, using placeholder");
                Profile::placeholder(user_id)
            });
            (user_id, profile)
        })
        .collect();

    let ledgers = join_all(posts.iter().map(|p| ctx.reaction_repo().find_by_post(p.id))).await;

    let mut entries = Vec::with_capacity(posts.len());
    for (post, ledger) in posts.into_iter().zip(ledgers) {
        let author = authors
            .get(&post.author_id)
            .cloned()
            .unwrap_or_else(|| Profile::placeholder(post.author_id));
        entries.push(FeedEntry {
            reactions: ReactionSummary::fold(&ledger?),
            author,
            post,
        });
    }

    trace!(generation, entries = entries.len(), "Feed evaluated");

    Ok(FeedSnapshot {
        generation,
        evaluated_at: now,
        entries,
    })
}
