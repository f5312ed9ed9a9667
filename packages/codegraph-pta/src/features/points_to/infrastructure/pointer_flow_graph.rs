//! Pointer flow graph
//!
//! Edge `s → t` means every object reaching `s` also reaches `t`. Edges
//! are never removed.

use crate::features::points_to::domain::PointerId;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Default)]
pub struct PointerFlowGraph {
    succs: FxHashMap<PointerId, Vec<PointerId>>,
    edge_set: FxHashSet<(PointerId, PointerId)>,
    edges: Vec<(PointerId, PointerId)>,
}

impl PointerFlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the edge was not present
    pub fn add_edge(&mut self, source: PointerId, target: PointerId) -> bool {
        if !self.edge_set.insert((source, target)) {
            return false;
        }
        self.succs.entry(source).or_default().push(target);
        self.edges.push((source, target));
        true
    }

    pub fn succs_of(&self, pointer: PointerId) -> &[PointerId] {
        self.succs.get(&pointer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_edge(&self, source: PointerId, target: PointerId) -> bool {
        self.edge_set.contains(&(source, target))
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[(PointerId, PointerId)] {
        &self.edges
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}
