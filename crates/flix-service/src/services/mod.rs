//! Business logic services
//!
//! Each service borrows the shared `ServiceContext` and is cheap to build
//! per call. The feed aggregator is the only one that outlives the call: it
//! clones the context into the task behind each subscription.

pub mod context;
pub mod error;
pub mod feed;
pub mod gate;
pub mod lifecycle;
pub mod memories;
pub mod post;
pub mod posting;
pub mod reaction;
pub mod visibility;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use feed::{FeedAggregator, FeedEntry, FeedScope, FeedSnapshot, FeedState, FeedSubscription};
pub use gate::GateKeeper;
pub use lifecycle::LifecycleReaper;
pub use memories::MemoriesService;
pub use post::PostStore;
pub use posting::PostingService;
pub use reaction::ReactionLedger;
pub use visibility::VisibilityResolver;
