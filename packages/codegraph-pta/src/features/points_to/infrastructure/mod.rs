//! Infrastructure layer for Points-to Analysis
//!
//! - **CsManager**: interning arenas for pointers and CS elements
//! - **PointerFlowGraph**: subset edges between pointers
//! - **WorkList**: pending propagations
//! - **Selectors**: ci / k-call / k-obj / k-type context policies
//! - **Solver**: on-the-fly call graph + propagation fixpoint

pub mod context_selector;
pub mod cs_manager;
pub mod heap_model;
pub mod pointer_flow_graph;
pub mod solver;
pub mod worklist;

pub use context_selector::{CallSiteSelector, ContextInsensitiveSelector, ObjectSelector, TypeSelector};
pub use cs_manager::CsManager;
pub use heap_model::AllocationSiteHeapModel;
pub use pointer_flow_graph::PointerFlowGraph;
pub use solver::{CsCallGraph, Solver, SolverStats};
pub use worklist::WorkList;
