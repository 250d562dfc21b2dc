//! # flix-store
//!
//! In-memory implementation of the persistent document store the feed
//! engine targets. Posts live in partitions (the global partition plus one
//! per circle) keyed by post id; every partition supports point reads,
//! filtered queries and live filtered subscriptions. Reaction ledgers,
//! circles and profiles are kept alongside so a whole engine can run on one
//! store.
//!
//! The store owns a server clock (system or manual) and a fault plan that
//! makes chosen partitions fail writes, deletes or subscriptions, which is
//! how partial fan-out and partial delete paths are exercised.

pub mod clock;
pub mod faults;
pub mod repositories;
pub mod store;

pub use clock::ServerClock;
pub use faults::{FaultPlan, StoreOp};
pub use repositories::{
    MemCircleRepository, MemPostRepository, MemProfileProvider, MemReactionRepository,
};
pub use store::MemoryStore;
