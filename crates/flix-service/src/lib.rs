//! # flix-service
//!
//! Application layer of the feed engine: audience resolution, fan-out
//! writes, the posting gate, live feed aggregation, the reaction ledger and
//! post deletion, plus the publish and memories flows built on them.

pub mod dto;
pub mod services;

pub use services::{
    FeedAggregator, FeedEntry, FeedScope, FeedSnapshot, FeedState, FeedSubscription, GateKeeper,
    LifecycleReaper, MemoriesService, PostStore, PostingService, ReactionLedger, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, VisibilityResolver,
};
