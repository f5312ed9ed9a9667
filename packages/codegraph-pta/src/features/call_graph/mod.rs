//! Call Graph Module
//!
//! Call graph data structure shared by CHA and by the on-the-fly
//! construction inside the points-to solver.

pub mod domain;
pub mod infrastructure;

pub use domain::{CallEdge, CallGraph, CallKind};
pub use infrastructure::{ChaBuilder, MethodCallGraph};
