//! Profile - lightweight author display data from the identity provider

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Snowflake,
    pub display_name: String,
    pub avatar_uri: Option<String>,
}

impl Profile {
    pub fn new(user_id: Snowflake, display_name: impl Into<String>, avatar_uri: Option<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            avatar_uri,
        }
    }

    /// Stand-in rendered when the identity provider has no profile
    pub fn placeholder(user_id: Snowflake) -> Self {
        Self {
            user_id,
            display_name: "Unknown user".to_string(),
            avatar_uri: None,
        }
    }
}
