//! Profile cache module.
//!
//! Memoizes identity provider lookups with a bounded staleness window.

mod profile_cache;

pub use profile_cache::{ProfileCache, DEFAULT_PROFILE_TTL};
