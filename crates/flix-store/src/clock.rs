//! Server-side clock.
//!
//! `created_at` is always taken from the store, never from the caller, so
//! the 24-hour window cannot be skewed by a client. Tests drive a manual
//! clock instead of the system one.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;

#[derive(Debug, Clone, Default)]
pub enum ServerClock {
    #[default]
    System,
    Manual(Arc<RwLock<DateTime<Utc>>>),
}

impl ServerClock {
    /// A manual clock frozen at `start`
    #[must_use]
    pub fn manual(start: DateTime<Utc>) -> Self {
        Self::Manual(Arc::new(RwLock::new(start)))
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Manual(time) => *time.read(),
        }
    }

    /// Move a manual clock forward; no effect on the system clock
    pub fn advance(&self, delta: TimeDelta) {
        if let Self::Manual(time) = self {
            *time.write() += delta;
        }
    }

    /// Set a manual clock; no effect on the system clock
    pub fn set(&self, to: DateTime<Utc>) {
        if let Self::Manual(time) = self {
            *time.write() = to;
        }
    }
}
