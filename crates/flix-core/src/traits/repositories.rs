//! Repository traits (ports) - define the interface for data access
//!
//! The feed engine is written against these traits. The persistent document
//! store, the identity provider and circle management each provide an
//! implementation; the engine never assumes a particular product.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

use crate::entities::{Circle, Post, Profile, Reaction};
use crate::error::DomainError;
use crate::value_objects::{Partition, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Live stream of partition snapshots.
///
/// The first item is the current snapshot; each later item is the full
/// filtered snapshot after a change. Dropping the stream releases the
/// underlying subscription.
pub type PostStream = BoxStream<'static, RepoResult<Vec<Post>>>;

// ============================================================================
// Post Filter
// ============================================================================

/// Predicate evaluated by the store for `query` and `subscribe`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub author_id: Option<Snowflake>,
    /// Inclusive lower bound on `created_at`
    pub created_since: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub created_before: Option<DateTime<Utc>>,
    /// Only posts whose audience is `Everyone`
    pub everyone_only: bool,
}

impl PostFilter {
    /// Posts by one author
    pub fn by_author(author_id: Snowflake) -> Self {
        Self {
            author_id: Some(author_id),
            ..Self::default()
        }
    }

    /// Posts created at or after `since`
    pub fn since(since: DateTime<Utc>) -> Self {
        Self {
            created_since: Some(since),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn before(mut self, before: DateTime<Utc>) -> Self {
        self.created_before = Some(before);
        self
    }

    #[must_use]
    pub fn everyone_only(mut self) -> Self {
        self.everyone_only = true;
        self
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.author_id.is_none_or(|id| post.author_id == id)
            && self.created_since.is_none_or(|since| post.created_at >= since)
            && self.created_before.is_none_or(|before| post.created_at < before)
            && (!self.everyone_only || post.audience.is_everyone())
    }
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Current time according to the store, used for `created_at`
    async fn server_time(&self) -> RepoResult<DateTime<Utc>>;

    /// Write (or overwrite) a post copy in a partition, keyed by post id
    async fn write(&self, partition: Partition, post: &Post) -> RepoResult<()>;

    /// Read one post copy by id
    async fn read(&self, partition: Partition, post_id: Snowflake) -> RepoResult<Option<Post>>;

    /// One-shot filtered snapshot of a partition
    async fn query(&self, partition: Partition, filter: &PostFilter) -> RepoResult<Vec<Post>>;

    /// Live filtered snapshots of a partition
    async fn subscribe(&self, partition: Partition, filter: PostFilter) -> RepoResult<PostStream>;

    /// Delete a post copy; deleting an absent copy is a no-op
    async fn delete(&self, partition: Partition, post_id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Create an empty ledger for a new post; a no-op if it already exists
    async fn create_ledger(&self, post_id: Snowflake) -> RepoResult<()>;

    /// Append an entry to a post's ledger. Fails with `PostNotFound` when
    /// the post has no ledger; never creates one.
    async fn append(&self, reaction: &Reaction) -> RepoResult<()>;

    /// All entries for a post in arrival order (empty if no ledger)
    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<Reaction>>;

    /// Drop a post's whole ledger; a no-op if it does not exist
    async fn delete_ledger(&self, post_id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Circle Repository
// ============================================================================

/// Read-only view of circle management
#[async_trait]
pub trait CircleRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Circle>>;

    /// Circles the user is a member of
    async fn find_by_member(&self, user_id: Snowflake) -> RepoResult<Vec<Circle>>;
}

// ============================================================================
// Identity Provider
// ============================================================================

#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn fetch_profile(&self, user_id: Snowflake) -> RepoResult<Option<Profile>>;
}
