//! Storage partitions.
//!
//! Every post has one canonical copy in the global partition and one
//! fan-out copy per addressed circle. Partition names follow the document
//! store's collection naming.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Snowflake;

/// Collection holding every canonical post copy
pub const GLOBAL_PARTITION: &str = "posts";
/// Prefix for per-circle fan-out collections
pub const CIRCLE_PARTITION_PREFIX: &str = "circle:";

/// A post partition in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Partition {
    /// Canonical copies of all posts, queryable by author
    Global,
    /// Fan-out copies addressed to one circle
    Circle(Snowflake),
}

impl Partition {
    #[must_use]
    pub fn circle(circle_id: Snowflake) -> Self {
        Self::Circle(circle_id)
    }

    #[inline]
    pub fn is_canonical(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// Collection name in the document store
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Global => GLOBAL_PARTITION.to_string(),
            Self::Circle(id) => format!("{CIRCLE_PARTITION_PREFIX}{id}"),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
