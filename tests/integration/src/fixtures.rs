//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use flix_core::{AudienceTarget, Circle, ImageRef, Profile, Snowflake};
use flix_service::dto::CreatePostRequest;
use flix_store::MemoryStore;

/// Counter for unique test ids
static COUNTER: AtomicI64 = AtomicI64::new(1_000);

/// Get a fresh id for a user or circle
pub fn unique_id() -> Snowflake {
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Start of every scenario's manual clock
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn images(count: usize) -> Vec<ImageRef> {
    (1..=count)
        .map(|i| ImageRef::new(format!("https://objects.test/img/{i}.jpg")))
        .collect()
}

/// Create post request builder
pub struct PostRequest;

impl PostRequest {
    pub fn everyone(image_count: usize) -> CreatePostRequest {
        CreatePostRequest {
            images: images(image_count)
                .into_iter()
                .map(|i| i.as_str().to_string())
                .collect(),
            caption: Some("fixture post".to_string()),
            targets: Vec::new(),
        }
    }

    pub fn to_circles(circles: &[Snowflake]) -> CreatePostRequest {
        CreatePostRequest {
            targets: circles.iter().copied().map(AudienceTarget::Circle).collect(),
            ..Self::everyone(1)
        }
    }
}

/// A user with a seeded profile
#[derive(Debug, Clone, Copy)]
pub struct TestUser {
    pub id: Snowflake,
}

impl TestUser {
    pub fn seed(store: &MemoryStore, name: &str) -> Self {
        let id = unique_id();
        store.put_profile(Profile::new(id, name, Some(format!("https://objects.test/avatar/{id}"))));
        Self { id }
    }
}

/// Seed a circle owned by `owner` with extra `members`
pub fn seed_circle(store: &MemoryStore, owner: TestUser, members: &[TestUser]) -> Snowflake {
    let id = unique_id();
    store.put_circle(Circle::new(
        id,
        format!("circle {id}"),
        owner.id,
        members.iter().map(|m| m.id),
    ));
    id
}
