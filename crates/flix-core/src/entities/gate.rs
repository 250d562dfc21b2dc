//! Viewer gate state - whether a viewer currently holds a valid post

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::{is_valid_at, validity_window};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Derived, never persisted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewerGateState {
    pub has_valid_post: bool,
    /// Fractional hours until the viewer may post again; never negative
    pub hours_until_next_post: f64,
}

impl ViewerGateState {
    /// State of a viewer who has never posted
    pub const fn locked() -> Self {
        Self {
            has_valid_post: false,
            hours_until_next_post: 0.0,
        }
    }

    /// Evaluate from the creation time of the viewer's most recent post.
    ///
    /// A post timestamped in the future (clock skew) counts as age zero, so
    /// the remaining time never exceeds the window.
    pub fn evaluate(latest_post_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(created_at) = latest_post_at else {
            return Self::locked();
        };

        let age = (now - created_at).max(chrono::TimeDelta::zero());
        let remaining = (validity_window() - age).max(chrono::TimeDelta::zero());

        Self {
            has_valid_post: is_valid_at(created_at, now),
            hours_until_next_post: remaining.num_milliseconds() as f64 / MILLIS_PER_HOUR,
        }
    }

    /// Whether a new post may be published under the one-post-per-window rule
    #[inline]
    pub fn can_post(&self) -> bool {
        !self.has_valid_post
    }
}
