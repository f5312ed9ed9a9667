//! Domain models for call graphs

pub mod call_graph;
pub mod call_kind;

pub use call_graph::{CallEdge, CallGraph};
pub use call_kind::CallKind;
