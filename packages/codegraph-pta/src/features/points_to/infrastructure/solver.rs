//! Worklist solver for context-sensitive Andersen-style analysis
//!
//! Points-to propagation and call-graph construction share one worklist:
//! - a method becoming reachable seeds allocations, copies, static field
//!   accesses and static calls;
//! - a new object reaching a variable wires the instance field and array
//!   accesses based on it and resolves the calls it receives;
//! - resolving a call may make new methods reachable.
//!
//! Everything is monotone (sets and graphs only grow), so the fixpoint is
//! independent of the worklist order.
//!
//! # References
//! - Andersen, L. O. "Program Analysis and Specialization for C" (PhD 1994)
//! - Lhoták & Hendren "Context-Sensitive Points-to Analysis: Is It Worth It?" (CC 2006)

use super::cs_manager::CsManager;
use super::pointer_flow_graph::PointerFlowGraph;
use super::worklist::WorkList;
use crate::errors::{PtaError, Result};
use crate::features::call_graph::{CallEdge, CallGraph, CallKind};
use crate::features::class_hierarchy::ClassHierarchy;
use crate::features::points_to::domain::{
    ContextId, ContextTable, CsCallSite, CsCallSiteId, CsMethod, CsMethodId, CsObjId, PointerId,
    PointerKey, PointsToSet,
};
use crate::features::points_to::ports::{ContextSelector, HeapModel};
use crate::shared::models::{FieldAccess, Invoke, InvokeId, InvokeKind, MethodId, Program, Stmt, VarId};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Context-sensitive call graph built on the fly
pub type CsCallGraph = CallGraph<CsCallSiteId, CsMethodId>;

/// Solver statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverStats {
    pub reachable_methods: usize,
    pub call_edges: usize,
    pub pfg_edges: usize,
    pub pointers: usize,
    pub cs_objects: usize,
    pub contexts: usize,
    /// Worklist entries processed
    pub iterations: usize,
    /// Objects added to points-to sets
    pub propagations: usize,
    /// Receiver objects for which dispatch found no concrete method
    pub unresolved_calls: usize,
    pub duration_ms: f64,
}

/// Points-to solver for one program
pub struct Solver<'p> {
    pub(crate) program: &'p Program,
    pub(crate) hierarchy: ClassHierarchy<'p>,
    pub(crate) heap_model: Box<dyn HeapModel>,
    pub(crate) selector: Box<dyn ContextSelector>,
    pub(crate) contexts: ContextTable,
    pub(crate) csm: CsManager,
    pub(crate) pfg: PointerFlowGraph,
    pub(crate) call_graph: CsCallGraph,
    worklist: WorkList,
    pub(crate) stats: SolverStats,
    initialized: bool,
}

impl<'p> Solver<'p> {
    pub fn new(
        program: &'p Program,
        selector: Box<dyn ContextSelector>,
        heap_model: Box<dyn HeapModel>,
    ) -> Self {
        Self {
            program,
            hierarchy: ClassHierarchy::new(program),
            heap_model,
            selector,
            contexts: ContextTable::new(),
            csm: CsManager::new(),
            pfg: PointerFlowGraph::new(),
            call_graph: CallGraph::new(),
            worklist: WorkList::new(),
            stats: SolverStats::default(),
            initialized: false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Driver
    // ═══════════════════════════════════════════════════════════════════════

    /// Run to fixpoint
    pub fn solve(&mut self) -> Result<()> {
        let start = Instant::now();
        info!(
            "Points-to analysis started (selector={}, methods={})",
            self.selector.name(),
            self.program.num_methods()
        );

        self.initialize()?;
        while self.step()? {}

        self.refresh_stats();
        self.stats.duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            "Points-to analysis finished: {} reachable methods, {} call edges, {} pointers, {} iterations in {:.2}ms",
            self.stats.reachable_methods,
            self.stats.call_edges,
            self.stats.pointers,
            self.stats.iterations,
            self.stats.duration_ms
        );
        Ok(())
    }

    /// Make every entry method reachable in the empty context.
    ///
    /// Calling it again is a no-op.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        let entries = self.program.entry_methods();
        if entries.is_empty() {
            return Err(PtaError::NoEntryMethod);
        }
        self.initialized = true;
        let context = self.selector.empty_context();
        for &method in entries {
            let cs_method = self.csm.cs_method(context, method);
            self.call_graph.add_entry_method(cs_method);
            self.add_reachable(cs_method)?;
        }
        Ok(())
    }

    /// Process one worklist entry. Returns false once the worklist is empty.
    pub fn step(&mut self) -> Result<bool> {
        let Some((pointer, pts)) = self.worklist.poll_entry() else {
            return Ok(false);
        };
        self.stats.iterations += 1;

        let delta = self.propagate(pointer, &pts);
        if delta.is_empty() {
            return Ok(true);
        }
        if let PointerKey::Var { context, var } = self.csm.pointer_key(pointer) {
            for obj in delta.iter() {
                self.process_instance_accesses(context, var, obj);
                self.process_call(context, var, obj)?;
            }
        }
        Ok(true)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Reachability
    // ═══════════════════════════════════════════════════════════════════════

    /// Mark `cs_method` reachable and seed its statements.
    ///
    /// Seeding happens at most once per CS method. Static callees found
    /// while seeding are processed from an explicit stack.
    pub fn add_reachable(&mut self, cs_method: CsMethodId) -> Result<()> {
        let program = self.program;
        let mut pending = vec![cs_method];

        while let Some(current) = pending.pop() {
            let CsMethod { context, method } = self.csm.cs_method_of(current);
            let sites: Vec<CsCallSiteId> = program
                .invokes_in(method)
                .map(|invoke| self.csm.cs_call_site(context, invoke))
                .collect();
            if !self.call_graph.add_reachable_method(current, sites) {
                continue;
            }
            debug!(
                "New reachable method: {} in {}",
                program.method_display(method),
                self.contexts.display(context)
            );

            let cs = CsMethod { context, method };
            for (index, stmt) in program.method(method).stmts.iter().enumerate() {
                match stmt {
                    Stmt::New { lhs, ty } => {
                        let obj = self.heap_model.obj_of(program, method, index, ty);
                        let heap_context = self.selector.select_heap_context(
                            &mut self.contexts,
                            cs,
                            self.heap_model.obj(obj),
                        );
                        let cs_obj = self.csm.cs_obj(heap_context, obj);
                        let ptr = self.csm.cs_var(context, *lhs);
                        self.worklist.add_entry(ptr, PointsToSet::singleton(cs_obj));
                    }
                    Stmt::Copy { lhs, rhs } => {
                        let source = self.csm.cs_var(context, *rhs);
                        let target = self.csm.cs_var(context, *lhs);
                        self.add_pfg_edge(source, target);
                    }
                    Stmt::LoadField {
                        lhs,
                        access: FieldAccess::Static(field),
                    } => {
                        let source = self.csm.static_field(*field);
                        let target = self.csm.cs_var(context, *lhs);
                        self.add_pfg_edge(source, target);
                    }
                    Stmt::StoreField {
                        access: FieldAccess::Static(field),
                        rhs,
                    } => {
                        let source = self.csm.cs_var(context, *rhs);
                        let target = self.csm.static_field(*field);
                        self.add_pfg_edge(source, target);
                    }
                    Stmt::Invoke(invoke_id) => {
                        let invoke = program.invoke(*invoke_id);
                        if !invoke.is_static() {
                            continue;
                        }
                        if let Some(callee) = self.process_static_call(context, *invoke_id, invoke)? {
                            pending.push(callee);
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Resolve a static call; returns the callee if its edge is new
    fn process_static_call(
        &mut self,
        context: ContextId,
        invoke_id: InvokeId,
        invoke: &Invoke,
    ) -> Result<Option<CsMethodId>> {
        let Some(callee) = self.hierarchy.resolve_static(&invoke.method_ref) else {
            self.stats.unresolved_calls += 1;
            warn!(
                "Unresolved static call {} at {}",
                invoke.method_ref.subsignature,
                self.program.method_display(invoke.container)
            );
            return Ok(None);
        };
        let site = CsCallSite {
            context,
            invoke: invoke_id,
        };
        let site_id = self.csm.cs_call_site(context, invoke_id);
        let callee_context = self.selector.select_context(&mut self.contexts, site, callee);
        self.check_arity(invoke, callee)?;

        let cs_callee = self.csm.cs_method(callee_context, callee);
        if !self
            .call_graph
            .add_edge(CallEdge::new(CallKind::Static, site_id, cs_callee))
        {
            return Ok(None);
        }
        debug!(
            "New call edge: {} -> {}",
            invoke_id,
            self.program.method_display(callee)
        );
        self.wire_call(context, invoke, callee_context, callee);
        Ok(Some(cs_callee))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Propagation
    // ═══════════════════════════════════════════════════════════════════════

    /// Add `source → target`; on a new edge, schedules `pts(source)` into
    /// `target`. Returns true if the edge is new.
    pub fn add_pfg_edge(&mut self, source: PointerId, target: PointerId) -> bool {
        if !self.pfg.add_edge(source, target) {
            return false;
        }
        trace!("PFG edge {} -> {}", source, target);
        let pts = self.csm.points_to_set(source);
        if !pts.is_empty() {
            self.worklist.add_entry(target, pts.clone());
        }
        true
    }

    /// Merge `pts` into `pointer` and forward the new objects to its
    /// successors. Returns the new objects.
    pub fn propagate(&mut self, pointer: PointerId, pts: &PointsToSet) -> PointsToSet {
        let delta = self.csm.points_to_set_mut(pointer).add_all_diff(pts);
        if !delta.is_empty() {
            trace!("Propagate {} objects into {}", delta.len(), pointer);
            self.stats.propagations += delta.len();
            for succ in self.pfg.succs_of(pointer) {
                self.worklist.add_entry(*succ, delta.clone());
            }
        }
        delta
    }

    /// Wire field and array accesses based on `var` for the new object `obj`
    fn process_instance_accesses(&mut self, context: ContextId, var: VarId, obj: CsObjId) {
        let uses = self.program.var_uses(var);
        for &(field, rhs) in &uses.store_fields {
            let source = self.csm.cs_var(context, rhs);
            let target = self.csm.instance_field(obj, field);
            self.add_pfg_edge(source, target);
        }
        for &(field, lhs) in &uses.load_fields {
            let source = self.csm.instance_field(obj, field);
            let target = self.csm.cs_var(context, lhs);
            self.add_pfg_edge(source, target);
        }
        for &rhs in &uses.store_arrays {
            let source = self.csm.cs_var(context, rhs);
            let target = self.csm.array_index(obj);
            self.add_pfg_edge(source, target);
        }
        for &lhs in &uses.load_arrays {
            let source = self.csm.array_index(obj);
            let target = self.csm.cs_var(context, lhs);
            self.add_pfg_edge(source, target);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Calls
    // ═══════════════════════════════════════════════════════════════════════

    /// Resolve every call with receiver `var` against the new object `recv`
    pub fn process_call(&mut self, context: ContextId, var: VarId, recv: CsObjId) -> Result<()> {
        let program = self.program;
        let recv_cs = self.csm.cs_obj_of(recv);

        for &invoke_id in &program.var_uses(var).invokes {
            let invoke = program.invoke(invoke_id);
            let recv_obj = self.heap_model.obj(recv_cs.obj);
            let callee = match invoke.kind {
                InvokeKind::Special => self.hierarchy.resolve_special(&invoke.method_ref),
                InvokeKind::Virtual | InvokeKind::Interface => self
                    .hierarchy
                    .dispatch_on_type(&recv_obj.ty, &invoke.method_ref.subsignature),
                InvokeKind::Static => continue,
            };
            let Some(callee) = callee else {
                self.stats.unresolved_calls += 1;
                debug!(
                    "No target for {} on {} at {}",
                    invoke.method_ref.subsignature,
                    recv_obj,
                    program.method_display(invoke.container)
                );
                continue;
            };

            let site = CsCallSite {
                context,
                invoke: invoke_id,
            };
            let callee_context = self.selector.select_instance_context(
                &mut self.contexts,
                site,
                recv_cs,
                recv_obj,
                callee,
            );
            let Some(this) = program.method(callee).this else {
                return Err(PtaError::MissingThis {
                    method: program.method_display(callee),
                });
            };
            self.check_arity(invoke, callee)?;

            let this_ptr = self.csm.cs_var(callee_context, this);
            self.worklist.add_entry(this_ptr, PointsToSet::singleton(recv));

            let site_id = self.csm.cs_call_site(context, invoke_id);
            let cs_callee = self.csm.cs_method(callee_context, callee);
            if self
                .call_graph
                .add_edge(CallEdge::new(CallKind::of(invoke), site_id, cs_callee))
            {
                debug!(
                    "New call edge: {} -> {} in {}",
                    invoke_id,
                    program.method_display(callee),
                    self.contexts.display(callee_context)
                );
                self.add_reachable(cs_callee)?;
                self.wire_call(context, invoke, callee_context, callee);
            }
        }
        Ok(())
    }

    /// Arguments → parameters, return variables → call result
    fn wire_call(
        &mut self,
        caller_context: ContextId,
        invoke: &Invoke,
        callee_context: ContextId,
        callee: MethodId,
    ) {
        let method = self.program.method(callee);
        for (arg, param) in invoke.args.iter().zip(&method.params) {
            let source = self.csm.cs_var(caller_context, *arg);
            let target = self.csm.cs_var(callee_context, *param);
            self.add_pfg_edge(source, target);
        }
        if let Some(result) = invoke.result {
            let target = self.csm.cs_var(caller_context, result);
            for ret in &method.return_vars {
                let source = self.csm.cs_var(callee_context, *ret);
                self.add_pfg_edge(source, target);
            }
        }
    }

    fn check_arity(&self, invoke: &Invoke, callee: MethodId) -> Result<()> {
        let expected = self.program.method(callee).params.len();
        if invoke.args.len() != expected {
            return Err(PtaError::ArityMismatch {
                call_site: format!(
                    "{}#{}",
                    self.program.method_display(invoke.container),
                    invoke.index
                ),
                callee: self.program.method_display(callee),
                expected,
                found: invoke.args.len(),
            });
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════

    fn refresh_stats(&mut self) {
        self.stats.reachable_methods = self.call_graph.num_reachable_methods();
        self.stats.call_edges = self.call_graph.num_edges();
        self.stats.pfg_edges = self.pfg.num_edges();
        self.stats.pointers = self.csm.num_pointers();
        self.stats.cs_objects = self.csm.num_cs_objs();
        self.stats.contexts = self.contexts.len();
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// Interned pointer for `key`, created if needed
    pub fn pointer(&mut self, key: PointerKey) -> PointerId {
        self.csm.pointer(key)
    }

    /// CS method for `(context, method)`, created if needed
    pub fn cs_method(&mut self, context: ContextId, method: MethodId) -> CsMethodId {
        self.csm.cs_method(context, method)
    }

    pub fn points_to_set(&self, pointer: PointerId) -> &PointsToSet {
        self.csm.points_to_set(pointer)
    }

    pub fn cs_manager(&self) -> &CsManager {
        &self.csm
    }

    pub fn contexts(&self) -> &ContextTable {
        &self.contexts
    }

    pub fn pfg(&self) -> &PointerFlowGraph {
        &self.pfg
    }

    pub fn call_graph(&self) -> &CsCallGraph {
        &self.call_graph
    }

    pub fn heap_model(&self) -> &dyn HeapModel {
        self.heap_model.as_ref()
    }

    pub fn selector_name(&self) -> String {
        self.selector.name()
    }

    pub fn pending(&self) -> usize {
        self.worklist.len()
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }
}
