//! Reaction entity - one entry in a post's append-only reaction ledger

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Reaction ledger entry
///
/// Entries are never updated or removed individually; the same reactor may
/// append the same symbol any number of times and every entry counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub post_id: Snowflake,
    pub reactor_id: Snowflake,
    pub symbol: String,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(
        post_id: Snowflake,
        reactor_id: Snowflake,
        symbol: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            post_id,
            reactor_id,
            symbol: symbol.into(),
            created_at,
        }
    }

    #[inline]
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.symbol == symbol
    }
}

/// Count of reactions per distinct symbol, folded from the ledger at read time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionSummary(BTreeMap<String, u64>);

impl ReactionSummary {
    /// Fold a ledger into per-symbol counts
    pub fn fold<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a Reaction>,
    {
        let mut counts = BTreeMap::new();
        for entry in entries {
            *counts.entry(entry.symbol.clone()).or_insert(0) += 1;
        }
        Self(counts)
    }

    /// Count for `symbol`, zero when nobody used it
    pub fn count(&self, symbol: &str) -> u64 {
        self.0.get(symbol).copied().unwrap_or(0)
    }

    pub fn get(&self, symbol: &str) -> Option<u64> {
        self.0.get(symbol).copied()
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(symbol, count)| (symbol.as_str(), *count))
    }
}
