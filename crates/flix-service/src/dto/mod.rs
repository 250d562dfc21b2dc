//! Data transfer objects for commands entering the engine
//!
//! Request DTOs implement `Deserialize` and `Validate` for input validation.

pub mod requests;

pub use requests::{AddReactionRequest, CreatePostRequest};
