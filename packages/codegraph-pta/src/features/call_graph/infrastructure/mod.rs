//! Infrastructure layer for call graphs
//!
//! - **ChaBuilder**: class-hierarchy-only call graph
//! - **export**: petgraph / DOT rendering

pub mod cha_builder;
pub mod export;

pub use cha_builder::{ChaBuilder, MethodCallGraph};
pub use export::{to_dot, to_petgraph};
