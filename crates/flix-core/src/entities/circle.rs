//! Circle entity - a named group of users scoping post visibility

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Circle entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub id: Snowflake,
    pub name: String,
    pub owner_id: Snowflake,
    /// Member ids, owner included
    pub members: BTreeSet<Snowflake>,
}

impl Circle {
    /// Create a circle; the owner is always a member
    pub fn new<I>(id: Snowflake, name: impl Into<String>, owner_id: Snowflake, members: I) -> Self
    where
        I: IntoIterator<Item = Snowflake>,
    {
        let mut members: BTreeSet<_> = members.into_iter().collect();
        members.insert(owner_id);
        Self {
            id,
            name: name.into(),
            owner_id,
            members,
        }
    }

    #[inline]
    pub fn is_member(&self, user_id: Snowflake) -> bool {
        self.members.contains(&user_id)
    }
}
