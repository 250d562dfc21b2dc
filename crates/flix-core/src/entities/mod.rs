//! Domain entities - core business objects

mod circle;
mod gate;
mod post;
mod profile;
mod reaction;

pub use circle::Circle;
pub use gate::ViewerGateState;
pub use post::{is_valid_at, validity_window, Post, VALIDITY_HOURS};
pub use profile::Profile;
pub use reaction::{Reaction, ReactionSummary};
