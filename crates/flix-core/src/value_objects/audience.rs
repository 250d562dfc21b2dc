//! Post audience - who a post is addressed to

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Partition, Snowflake};
use crate::error::DomainError;

/// Resolved audience of a post, fixed at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "circles", rename_all = "snake_case")]
pub enum Audience {
    /// Visible in the global feed
    Everyone,
    /// Visible only to members of these circles (never empty)
    Circles(BTreeSet<Snowflake>),
}

impl Audience {
    /// Build a circle audience, rejecting an empty set
    pub fn circles<I>(ids: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = Snowflake>,
    {
        let ids: BTreeSet<_> = ids.into_iter().collect();
        if ids.is_empty() {
            return Err(DomainError::InvalidAudience);
        }
        Ok(Self::Circles(ids))
    }

    #[inline]
    pub fn is_everyone(&self) -> bool {
        matches!(self, Self::Everyone)
    }

    /// Circle ids addressed by this audience (empty for `Everyone`)
    pub fn circle_ids(&self) -> impl Iterator<Item = Snowflake> + '_ {
        let ids = match self {
            Self::Everyone => None,
            Self::Circles(ids) => Some(ids.iter().copied()),
        };
        ids.into_iter().flatten()
    }

    pub fn includes_circle(&self, circle_id: Snowflake) -> bool {
        match self {
            Self::Everyone => false,
            Self::Circles(ids) => ids.contains(&circle_id),
        }
    }

    /// Partitions that receive a fan-out copy (the canonical copy excluded)
    pub fn fanout_partitions(&self) -> Vec<Partition> {
        self.circle_ids().map(Partition::Circle).collect()
    }
}

/// A single selection made in the audience picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AudienceTarget {
    Everyone,
    Circle(Snowflake),
}
