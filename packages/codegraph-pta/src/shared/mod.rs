//! Shared module - Common types and utilities
//!
//! This module contains the program IR shared across all features.

pub mod models;

// Re-exports for convenience
pub use models::*;
