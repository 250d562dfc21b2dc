//! # flix-cache
//!
//! Caching layer for author display data.
//!
//! ## Features
//!
//! - **Profile cache**: TTL-bounded memoization over the identity provider.
//!   A miss or an expired entry falls through to a fresh lookup; an entry is
//!   never trusted past its TTL.
//!
//! ## Example
//!
//! ```ignore
//! use flix_cache::ProfileCache;
//!
//! let cache = ProfileCache::new(provider, Duration::from_secs(300));
//! let author = cache.get(post.author_id).await?;
//! ```

pub mod profile;

pub use profile::{ProfileCache, DEFAULT_PROFILE_TTL};
