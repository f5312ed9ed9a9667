//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains, where it needs them:
//! - domain/     - Pure data (no solver logic)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - Algorithms and data structure implementations

pub mod call_graph;
pub mod class_hierarchy;

// Andersen-style points-to analysis with on-the-fly call graph
pub mod points_to;
