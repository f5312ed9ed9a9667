//! Call graph
//!
//! Generic over the call-site type `CS` and method type `M` so the same
//! structure serves the context-insensitive graph (`InvokeId`, `MethodId`)
//! and the context-sensitive one built by the points-to solver.
//!
//! Nodes and edges are only ever added. Reachability and edge insertion
//! report whether anything changed, which is what drives on-the-fly
//! construction.

use super::call_kind::CallKind;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// `call_site --kind--> callee`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallEdge<CS, M> {
    pub kind: CallKind,
    pub call_site: CS,
    pub callee: M,
}

impl<CS, M> CallEdge<CS, M> {
    pub fn new(kind: CallKind, call_site: CS, callee: M) -> Self {
        Self {
            kind,
            call_site,
            callee,
        }
    }
}

/// Call graph with reachable methods, call sites and dispatch-tagged edges
#[derive(Debug, Clone)]
pub struct CallGraph<CS, M> {
    entry_methods: Vec<M>,

    /// Reachable methods in discovery order
    reachable: Vec<M>,
    reachable_set: FxHashSet<M>,

    /// Call sites of each reachable method, registered when it becomes reachable
    call_sites_in: FxHashMap<M, Vec<CS>>,
    container_of: FxHashMap<CS, M>,

    /// Edges in insertion order
    edges: Vec<CallEdge<CS, M>>,
    edge_set: FxHashSet<CallEdge<CS, M>>,
    callees: FxHashMap<CS, Vec<M>>,
    callers: FxHashMap<M, Vec<CS>>,
}

impl<CS, M> Default for CallGraph<CS, M>
where
    CS: Copy + Eq + Hash,
    M: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<CS, M> CallGraph<CS, M>
where
    CS: Copy + Eq + Hash,
    M: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            entry_methods: Vec::new(),
            reachable: Vec::new(),
            reachable_set: FxHashSet::default(),
            call_sites_in: FxHashMap::default(),
            container_of: FxHashMap::default(),
            edges: Vec::new(),
            edge_set: FxHashSet::default(),
            callees: FxHashMap::default(),
            callers: FxHashMap::default(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Mutation
    // ═══════════════════════════════════════════════════════════════════════

    pub fn add_entry_method(&mut self, method: M) {
        if !self.entry_methods.contains(&method) {
            self.entry_methods.push(method);
        }
    }

    /// Mark `method` reachable together with its call sites.
    ///
    /// Returns `false` (and ignores `call_sites`) if it already was.
    pub fn add_reachable_method(
        &mut self,
        method: M,
        call_sites: impl IntoIterator<Item = CS>,
    ) -> bool {
        if !self.reachable_set.insert(method) {
            return false;
        }
        self.reachable.push(method);
        let sites: Vec<CS> = call_sites.into_iter().collect();
        for cs in &sites {
            self.container_of.insert(*cs, method);
        }
        self.call_sites_in.insert(method, sites);
        true
    }

    /// Add an edge; returns `false` if the same (site, kind, callee) exists
    pub fn add_edge(&mut self, edge: CallEdge<CS, M>) -> bool {
        if !self.edge_set.insert(edge) {
            return false;
        }
        self.edges.push(edge);
        let callees = self.callees.entry(edge.call_site).or_default();
        if !callees.contains(&edge.callee) {
            callees.push(edge.callee);
        }
        let callers = self.callers.entry(edge.callee).or_default();
        if !callers.contains(&edge.call_site) {
            callers.push(edge.call_site);
        }
        true
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    pub fn entry_methods(&self) -> &[M] {
        &self.entry_methods
    }

    pub fn contains(&self, method: M) -> bool {
        self.reachable_set.contains(&method)
    }

    /// Reachable methods in discovery order
    pub fn reachable_methods(&self) -> &[M] {
        &self.reachable
    }

    pub fn call_sites_in(&self, method: M) -> &[CS] {
        self.call_sites_in
            .get(&method)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Method containing `call_site`, once that method is reachable
    pub fn container_of(&self, call_site: CS) -> Option<M> {
        self.container_of.get(&call_site).copied()
    }

    pub fn callees_of(&self, call_site: CS) -> &[M] {
        self.callees
            .get(&call_site)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn callers_of(&self, method: M) -> &[CS] {
        self.callers
            .get(&method)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Callees of every call site in `method`
    pub fn callees_of_method(&self, method: M) -> Vec<M> {
        let mut out = Vec::new();
        for cs in self.call_sites_in(method) {
            for callee in self.callees_of(*cs) {
                if !out.contains(callee) {
                    out.push(*callee);
                }
            }
        }
        out
    }

    pub fn edges(&self) -> &[CallEdge<CS, M>] {
        &self.edges
    }

    pub fn edges_out_of(&self, call_site: CS) -> impl Iterator<Item = &CallEdge<CS, M>> + '_ {
        self.edges.iter().filter(move |e| e.call_site == call_site)
    }

    pub fn contains_edge(&self, edge: &CallEdge<CS, M>) -> bool {
        self.edge_set.contains(edge)
    }

    pub fn num_reachable_methods(&self) -> usize {
        self.reachable.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Map both node kinds, merging nodes and edges that collapse together
    pub fn project<CS2, M2>(
        &self,
        mut map_site: impl FnMut(CS) -> CS2,
        mut map_method: impl FnMut(M) -> M2,
    ) -> CallGraph<CS2, M2>
    where
        CS2: Copy + Eq + Hash,
        M2: Copy + Eq + Hash,
    {
        let mut out = CallGraph::new();
        for m in &self.entry_methods {
            out.add_entry_method(map_method(*m));
        }
        for m in &self.reachable {
            let target = map_method(*m);
            let sites: Vec<CS2> = self.call_sites_in(*m).iter().map(|cs| map_site(*cs)).collect();
            out.add_reachable_method(target, sites);
        }
        for e in &self.edges {
            out.add_edge(CallEdge::new(
                e.kind,
                map_site(e.call_site),
                map_method(e.callee),
            ));
        }
        out
    }
}
