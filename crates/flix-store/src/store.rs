//! Shared in-memory store state.
//!
//! `MemoryStore` plays the role of a connection pool: it is cheap to clone
//! and every repository holds one. Each partition has a version counter on a
//! `watch` channel that is bumped on every change; live subscriptions wait
//! on it and re-run their filter.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use flix_core::{Circle, Partition, Post, PostFilter, Profile, Reaction, RepoResult, Snowflake};
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::clock::ServerClock;
use crate::faults::{FaultPlan, StoreOp};

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    partitions: DashMap<Partition, BTreeMap<Snowflake, Post>>,
    notifiers: DashMap<Partition, watch::Sender<u64>>,
    ledgers: DashMap<Snowflake, Vec<Reaction>>,
    circles: DashMap<Snowflake, Circle>,
    profiles: DashMap<Snowflake, Profile>,
    profile_lookups: AtomicUsize,
    clock: ServerClock,
    faults: RwLock<FaultPlan>,
}

impl MemoryStore {
    /// Store backed by the system clock
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: ServerClock) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                clock,
                ..StoreInner::default()
            }),
        }
    }

    pub fn clock(&self) -> &ServerClock {
        &self.inner.clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    // === Collaborator data ===

    pub fn put_circle(&self, circle: Circle) {
        self.inner.circles.insert(circle.id, circle);
    }

    pub fn put_profile(&self, profile: Profile) {
        self.inner.profiles.insert(profile.user_id, profile);
    }

    /// Number of profile lookups served so far
    pub fn profile_lookups(&self) -> usize {
        self.inner.profile_lookups.load(Ordering::Relaxed)
    }

    // === Fault injection ===

    /// Make `op` fail on `partition` until healed
    pub fn inject_fault(&self, op: StoreOp, partition: Option<Partition>) {
        self.inner.faults.write().inject(op, partition);
        if let (StoreOp::Subscribe, Some(partition)) = (op, partition) {
            // Wake open subscriptions so they observe the failure
            self.notify(partition);
        }
    }

    pub fn heal(&self, op: StoreOp, partition: Option<Partition>) {
        self.inner.faults.write().heal(op, partition);
    }

    pub fn heal_all(&self) {
        self.inner.faults.write().heal_all();
    }

    // === Introspection ===

    /// Live subscriptions currently attached to a partition
    pub fn active_subscriptions(&self, partition: Partition) -> usize {
        self.inner
            .notifiers
            .get(&partition)
            .map_or(0, |tx| tx.receiver_count())
    }

    pub fn document_count(&self, partition: Partition) -> usize {
        self.inner.partitions.get(&partition).map_or(0, |docs| docs.len())
    }

    pub fn has_ledger(&self, post_id: Snowflake) -> bool {
        self.inner.ledgers.contains_key(&post_id)
    }

    pub fn ledger_count(&self) -> usize {
        self.inner.ledgers.len()
    }

    // === Crate-internal primitives ===

    pub(crate) fn check(&self, op: StoreOp, partition: Option<Partition>) -> RepoResult<()> {
        self.inner.faults.read().check(op, partition)
    }

    pub(crate) fn put_post(&self, partition: Partition, post: Post) {
        self.inner
            .partitions
            .entry(partition)
            .or_default()
            .insert(post.id, post);
        self.notify(partition);
    }

    /// Returns whether a copy was present
    pub(crate) fn remove_post(&self, partition: Partition, post_id: Snowflake) -> bool {
        let removed = self
            .inner
            .partitions
            .get_mut(&partition)
            .and_then(|mut docs| docs.remove(&post_id))
            .is_some();
        if removed {
            self.notify(partition);
        }
        removed
    }

    pub(crate) fn get_post(&self, partition: Partition, post_id: Snowflake) -> Option<Post> {
        self.inner
            .partitions
            .get(&partition)
            .and_then(|docs| docs.get(&post_id).cloned())
    }

    pub(crate) fn snapshot(&self, partition: Partition, filter: &PostFilter) -> Vec<Post> {
        self.inner
            .partitions
            .get(&partition)
            .map(|docs| docs.values().filter(|p| filter.matches(p)).cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn changes(&self, partition: Partition) -> watch::Receiver<u64> {
        self.inner
            .notifiers
            .entry(partition)
            .or_insert_with(|| watch::channel(0).0)
            .subscribe()
    }

    fn notify(&self, partition: Partition) {
        if let Some(tx) = self.inner.notifiers.get(&partition) {
            tx.send_modify(|version| *version += 1);
        }
    }

    pub(crate) fn ledger_create(&self, post_id: Snowflake) {
        self.inner.ledgers.entry(post_id).or_default();
    }

    /// Returns false when the post has no ledger
    pub(crate) fn ledger_append(&self, reaction: Reaction) -> bool {
        match self.inner.ledgers.get_mut(&reaction.post_id) {
            Some(mut entries) => {
                entries.push(reaction);
                true
            }
            None => false,
        }
    }

    pub(crate) fn ledger_entries(&self, post_id: Snowflake) -> Vec<Reaction> {
        self.inner
            .ledgers
            .get(&post_id)
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub(crate) fn ledger_remove(&self, post_id: Snowflake) {
        self.inner.ledgers.remove(&post_id);
    }

    pub(crate) fn circle(&self, id: Snowflake) -> Option<Circle> {
        self.inner.circles.get(&id).map(|c| c.clone())
    }

    pub(crate) fn circles_of(&self, user_id: Snowflake) -> Vec<Circle> {
        let mut circles: Vec<_> = self
            .inner
            .circles
            .iter()
            .filter(|c| c.is_member(user_id))
            .map(|c| c.clone())
            .collect();
        circles.sort_by_key(|c| c.id);
        circles
    }

    pub(crate) fn profile(&self, user_id: Snowflake) -> Option<Profile> {
        self.inner.profile_lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.profiles.get(&user_id).map(|p| p.clone())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("partitions", &self.inner.partitions.len())
            .field("ledgers", &self.inner.ledgers.len())
            .field("clock", &self.inner.clock)
            .finish()
    }
}
