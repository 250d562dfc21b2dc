//! Snowflake ID - 64-bit, time-ordered unique identifier
//!
//! Structure:
//! - Bits 63-22: Timestamp (milliseconds since custom epoch)
//! - Bits 21-12: Worker ID (0-1023)
//! - Bits 11-0:  Sequence number (0-4095)
//!
//! Post ids are Snowflakes, so ordering two ids approximates ordering their
//! creation times. The feed uses the id only as a tie-breaker.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const WORKER_BITS: i64 = 0x3FF;
const SEQUENCE_BITS: i64 = 0xFFF;

/// Time-ordered 64-bit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Custom epoch: 2024-01-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1_704_067_200_000;

    /// Create a Snowflake from a raw value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Milliseconds since the Unix epoch encoded in the id
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> 22) + Self::EPOCH
    }

    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> 12) & WORKER_BITS) as u16
    }

    #[inline]
    pub fn sequence(&self) -> u16 {
        (self.0 & SEQUENCE_BITS) as u16
    }

    /// Parse from the decimal string representation
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.trim()
            .parse::<i64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }
}

/// Error when parsing a Snowflake from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Serialized as a string so document stores and JSON clients never truncate it
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer snowflake id")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Snowflake, E> {
                Ok(Snowflake(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Snowflake, E> {
                i64::try_from(value)
                    .map(Snowflake)
                    .map_err(|_| de::Error::custom("snowflake out of range"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Snowflake, E> {
                Snowflake::parse(value).map_err(|_| de::Error::custom("invalid snowflake string"))
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

/// Lock-free Snowflake generator
///
/// Keeps the last issued id in a single atomic. A new id is the current
/// millisecond with a zero sequence, or the last id plus one when the clock
/// has not advanced (or went backwards). When the sequence is exhausted the
/// timestamp part is bumped instead, so ids stay unique and strictly
/// increasing without ever sleeping.
pub struct SnowflakeGenerator {
    worker_id: u16,
    last: AtomicI64,
}

impl SnowflakeGenerator {
    /// # Panics
    /// Panics if worker_id >= 1024
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id < 1024, "Worker ID must be < 1024");
        Self {
            worker_id,
            last: AtomicI64::new(0),
        }
    }

    pub fn generate(&self) -> Snowflake {
        let worker = i64::from(self.worker_id) << 12;
        loop {
            let fresh = ((current_millis() - Snowflake::EPOCH) << 22) | worker;
            let last = self.last.load(Ordering::Acquire);

            let next = if fresh > last {
                fresh
            } else if last & SEQUENCE_BITS == SEQUENCE_BITS {
                (((last >> 22) + 1) << 22) | worker
            } else {
                last + 1
            };

            if self
                .last
                .compare_exchange(last, next, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return Snowflake::new(next);
            }
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

fn current_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(Snowflake::EPOCH)
}
