//! Post entity - an ephemeral, audience-scoped photo post

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{Audience, ImageRef, Partition, Snowflake};

/// Length of the validity window in hours
pub const VALIDITY_HOURS: i64 = 24;

/// The validity window as a duration
#[inline]
pub fn validity_window() -> TimeDelta {
    TimeDelta::hours(VALIDITY_HOURS)
}

/// Whether something created at `created_at` is still current at `now`.
///
/// Valid at exactly `created_at`, invalid at exactly `created_at + 24h`.
/// This is the only place the 24-hour rule is evaluated.
#[inline]
pub fn is_valid_at(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - created_at < validity_window()
}

/// Post entity
///
/// Every fan-out copy of a post is a clone of the same value, so copies
/// compare equal field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub images: Vec<ImageRef>,
    pub caption: Option<String>,
    pub audience: Audience,
}

impl Post {
    /// Create a new Post, rejecting an empty image list
    pub fn new(
        id: Snowflake,
        author_id: Snowflake,
        created_at: DateTime<Utc>,
        images: Vec<ImageRef>,
        caption: Option<String>,
        audience: Audience,
    ) -> Result<Self, DomainError> {
        if images.is_empty() {
            return Err(DomainError::NoImageSelected);
        }
        if images.iter().any(ImageRef::is_blank) {
            return Err(DomainError::ValidationError(
                "image reference must not be blank".to_string(),
            ));
        }

        Ok(Self {
            id,
            author_id,
            created_at,
            images,
            caption,
            audience,
        })
    }

    #[inline]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        is_valid_at(self.created_at, now)
    }

    #[inline]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + validity_window()
    }

    /// Partitions holding a copy of this post, canonical first
    pub fn partitions(&self) -> Vec<Partition> {
        std::iter::once(Partition::Global)
            .chain(self.audience.fanout_partitions())
            .collect()
    }

    /// Whether the post is addressed to `partition`
    pub fn belongs_to(&self, partition: &Partition) -> bool {
        match partition {
            Partition::Global => true,
            Partition::Circle(id) => self.audience.includes_circle(*id),
        }
    }
}
