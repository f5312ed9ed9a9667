//! Common test utilities for codegraph-pta
//!
//! Shared program fixtures and assertions for the integration tests.

#![allow(dead_code)]

mod assertions;
mod fixtures;

// Re-export all utilities
pub use assertions::*;
pub use fixtures::*;
