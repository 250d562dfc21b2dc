//! Repository implementations
//!
//! In-memory implementations of the repository traits defined in flix-core.
//! Each repository wraps a clone of the shared `MemoryStore`.

mod circle;
mod post;
mod profile;
mod reaction;

pub use circle::MemCircleRepository;
pub use post::MemPostRepository;
pub use profile::MemProfileProvider;
pub use reaction::MemReactionRepository;
