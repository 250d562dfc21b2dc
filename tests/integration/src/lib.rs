//! Integration test utilities for the feed engine
//!
//! This crate provides helpers for running end-to-end scenarios against
//! the services over an in-memory store with a manual clock.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
