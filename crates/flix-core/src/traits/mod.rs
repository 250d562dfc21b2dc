//! Repository traits (ports) implemented by the storage and identity layers

mod repositories;

pub use repositories::{
    CircleRepository, PostFilter, PostRepository, PostStream, ProfileProvider,
    ReactionRepository, RepoResult,
};
