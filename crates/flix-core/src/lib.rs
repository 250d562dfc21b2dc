//! # flix-core
//!
//! Domain layer for the ephemeral feed engine: posts and their audiences,
//! circles, reactions, the 24-hour validity rule, and the repository traits
//! the engine is written against. No storage or runtime dependencies.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    is_valid_at, validity_window, Circle, Post, Profile, Reaction, ReactionSummary,
    ViewerGateState, VALIDITY_HOURS,
};
pub use error::DomainError;
pub use traits::{
    CircleRepository, PostFilter, PostRepository, PostStream, ProfileProvider,
    ReactionRepository, RepoResult,
};
pub use value_objects::{
    Audience, AudienceTarget, ImageRef, Partition, Snowflake, SnowflakeGenerator,
    SnowflakeParseError,
};
