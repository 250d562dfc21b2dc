//! TTL cache over the identity provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::future::join_all;
use tokio::time::Instant;

use flix_core::{Profile, ProfileProvider, RepoResult, Snowflake};

/// Profile TTL (5 minutes)
pub const DEFAULT_PROFILE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CachedProfile {
    profile: Profile,
    fetched_at: Instant,
}

/// Memoized profile lookup shared by every feed subscription
#[derive(Clone)]
pub struct ProfileCache {
    provider: Arc<dyn ProfileProvider>,
    entries: Arc<DashMap<Snowflake, CachedProfile>>,
    ttl: Duration,
}

impl ProfileCache {
    pub fn new(provider: Arc<dyn ProfileProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn with_default_ttl(provider: Arc<dyn ProfileProvider>) -> Self {
        Self::new(provider, DEFAULT_PROFILE_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolve a profile, hitting the provider on a miss or an expired entry.
    ///
    /// A user the provider does not know resolves to `Profile::placeholder`;
    /// placeholders are not cached so a profile created later shows up on
    /// the next lookup.
    pub async fn get(&self, user_id: Snowflake) -> RepoResult<Profile> {
        if let Some(profile) = self.fresh(user_id) {
            tracing::trace!(user_id = %user_id, "Profile cache hit");
            return Ok(profile);
        }

        match self.provider.fetch_profile(user_id).await? {
            Some(profile) => {
                self.entries.insert(
                    user_id,
                    CachedProfile {
                        profile: profile.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                tracing::debug!(user_id = %user_id, "Profile cached");
                Ok(profile)
            }
            None => {
                tracing::debug!(user_id = %user_id, "Unknown user, using placeholder");
                Ok(Profile::placeholder(user_id))
            }
        }
    }

    /// Resolve several profiles concurrently, one lookup per distinct id.
    ///
    /// Each id maps to its own result so one failed lookup does not hide
    /// the others.
    pub async fn resolve_many<I>(&self, user_ids: I) -> HashMap<Snowflake, RepoResult<Profile>>
    where
        I: IntoIterator<Item = Snowflake>,
    {
        let mut ids: Vec<_> = user_ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();

        let results = join_all(ids.iter().map(|id| self.get(*id))).await;
        ids.into_iter().zip(results).collect()
    }

    /// Drop one cached entry
    pub fn invalidate(&self, user_id: Snowflake) {
        self.entries.remove(&user_id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries currently held, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fresh(&self, user_id: Snowflake) -> Option<Profile> {
        let entry = self.entries.get(&user_id)?;
        if entry.fetched_at.elapsed() < self.ttl {
            return Some(entry.profile.clone());
        }
        drop(entry);
        self.entries.remove(&user_id);
        None
    }
}

impl std::fmt::Debug for ProfileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
