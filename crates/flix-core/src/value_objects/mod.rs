//! Value objects - immutable, identity-less domain values

mod audience;
mod image;
mod partition;
mod snowflake;

pub use audience::{Audience, AudienceTarget};
pub use image::ImageRef;
pub use partition::Partition;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
