//! Points-to analysis results
//!
//! Owns the solver's final state. Queries come in two flavours:
//! context-sensitive (`cs_*`, returning [`CsObj`]s) and the
//! context-insensitive projection (returning [`ObjId`]s merged over all
//! contexts).

use crate::features::call_graph::{CallKind, MethodCallGraph};
use crate::features::points_to::domain::{
    ContextId, ContextTable, CsMethod, CsMethodId, CsObj, CsObjId, Obj, ObjId, PointerKey, PointsToSet,
};
use crate::features::points_to::infrastructure::{CsCallGraph, CsManager, Solver, SolverStats};
use crate::features::points_to::ports::HeapModel;
use crate::shared::models::{FieldId, MethodId, Program, VarId};
use serde::{Deserialize, Serialize};

pub struct PointerAnalysisResult<'p> {
    program: &'p Program,
    selector: String,
    contexts: ContextTable,
    csm: CsManager,
    heap_model: Box<dyn HeapModel>,
    call_graph: CsCallGraph,
    ci_call_graph: MethodCallGraph,
    pfg_edges: usize,
    stats: Option<SolverStats>,
}

impl<'p> PointerAnalysisResult<'p> {
    /// Take over a solved solver's state
    pub fn from_solver(solver: Solver<'p>, collect_stats: bool) -> Self {
        let selector = solver.selector_name();
        let Solver {
            program,
            heap_model,
            contexts,
            csm,
            pfg,
            call_graph,
            stats,
            ..
        } = solver;
        let ci_call_graph = call_graph.project(
            |site| csm.cs_call_site_of(site).invoke,
            |method| csm.cs_method_of(method).method,
        );
        Self {
            program,
            selector,
            contexts,
            csm,
            heap_model,
            call_graph,
            ci_call_graph,
            pfg_edges: pfg.num_edges(),
            stats: collect_stats.then_some(stats),
        }
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Variables
    // ═══════════════════════════════════════════════════════════════════════

    /// Every (context, variable) pair the analysis created a pointer for
    pub fn cs_vars(&self) -> Vec<(ContextId, VarId)> {
        self.csm.cs_vars().map(|(_, c, v)| (c, v)).collect()
    }

    /// Variables with at least one pointer, ascending
    pub fn vars(&self) -> Vec<VarId> {
        let mut vars: Vec<VarId> = self.csm.cs_vars().map(|(_, _, v)| v).collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    /// Objects `var` may point to in any context
    pub fn points_to(&self, var: VarId) -> Vec<ObjId> {
        let sets = self
            .csm
            .cs_vars()
            .filter(|(_, _, v)| *v == var)
            .map(|(p, _, _)| self.csm.points_to_set(p));
        self.project(sets)
    }

    /// Objects `var` may point to under `context`
    pub fn cs_points_to(&self, context: ContextId, var: VarId) -> Vec<CsObj> {
        self.cs_objs_of(&PointerKey::Var { context, var })
    }

    pub fn static_field_points_to(&self, field: FieldId) -> Vec<ObjId> {
        self.ci_objs_of(&PointerKey::StaticField(field))
    }

    /// `obj.field` merged over every heap context of `obj`
    pub fn instance_field_points_to(&self, obj: ObjId, field: FieldId) -> Vec<ObjId> {
        let sets = self
            .csm
            .instance_fields()
            .filter(|(_, base, f)| *f == field && self.csm.cs_obj_of(*base).obj == obj)
            .map(|(p, _, _)| self.csm.points_to_set(p));
        self.project(sets)
    }

    pub fn cs_instance_field_points_to(&self, base: CsObjId, field: FieldId) -> Vec<CsObj> {
        self.cs_objs_of(&PointerKey::InstanceField { base, field })
    }

    /// Elements of array `obj`, merged over heap contexts and indexes
    pub fn array_points_to(&self, obj: ObjId) -> Vec<ObjId> {
        let sets = self
            .csm
            .array_indexes()
            .filter(|(_, base)| self.csm.cs_obj_of(*base).obj == obj)
            .map(|(p, _)| self.csm.points_to_set(p));
        self.project(sets)
    }

    /// True if the variables share an object once contexts are merged
    pub fn may_alias(&self, a: VarId, b: VarId) -> bool {
        let pa = self.points_to(a);
        let pb = self.points_to(b);
        pa.iter().any(|o| pb.binary_search(o).is_ok())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Objects and contexts
    // ═══════════════════════════════════════════════════════════════════════

    pub fn objects(&self) -> &[Obj] {
        self.heap_model.objects()
    }

    pub fn object(&self, id: ObjId) -> &Obj {
        self.heap_model.obj(id)
    }

    pub fn cs_obj(&self, id: CsObjId) -> CsObj {
        self.csm.cs_obj_of(id)
    }

    pub fn contexts(&self) -> &ContextTable {
        &self.contexts
    }

    pub fn cs_manager(&self) -> &CsManager {
        &self.csm
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Call graphs
    // ═══════════════════════════════════════════════════════════════════════

    /// Context-sensitive call graph
    pub fn call_graph(&self) -> &CsCallGraph {
        &self.call_graph
    }

    pub fn cs_method(&self, id: CsMethodId) -> CsMethod {
        self.csm.cs_method_of(id)
    }

    /// Call graph with contexts projected away
    pub fn ci_call_graph(&self) -> &MethodCallGraph {
        &self.ci_call_graph
    }

    pub fn reachable_methods(&self) -> &[MethodId] {
        self.ci_call_graph.reachable_methods()
    }

    /// Context-sensitive callees of `method` under `context`
    pub fn cs_callees_of(&self, context: ContextId, method: MethodId) -> Vec<CsMethod> {
        let Some(cs_method) = self.csm.find_cs_method(context, method) else {
            return Vec::new();
        };
        self.call_graph
            .callees_of_method(cs_method)
            .into_iter()
            .map(|m| self.csm.cs_method_of(m))
            .collect()
    }

    pub fn stats(&self) -> Option<&SolverStats> {
        self.stats.as_ref()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Summary
    // ═══════════════════════════════════════════════════════════════════════

    /// Name-based, serialisable view of the context-insensitive results
    pub fn summary(&self) -> AnalysisSummary {
        let p = self.program;
        let points_to = self
            .vars()
            .into_iter()
            .map(|var| VarPointsTo {
                method: p.method_display(p.var(var).method),
                var: p.var(var).name.clone(),
                objects: self
                    .points_to(var)
                    .into_iter()
                    .map(|o| self.object_display(o))
                    .collect(),
            })
            .collect();
        let call_edges = self
            .ci_call_graph
            .edges()
            .iter()
            .map(|e| {
                let invoke = p.invoke(e.call_site);
                CallEdgeSummary {
                    caller: p.method_display(invoke.container),
                    stmt: invoke.index,
                    kind: e.kind,
                    callee: p.method_display(e.callee),
                }
            })
            .collect();

        AnalysisSummary {
            selector: self.selector.clone(),
            reachable_methods: self
                .reachable_methods()
                .iter()
                .map(|m| p.method_display(*m))
                .collect(),
            call_edges,
            points_to,
            objects: self.objects().len(),
            cs_objects: self.csm.num_cs_objs(),
            pointers: self.csm.num_pointers(),
            pfg_edges: self.pfg_edges,
            contexts: self.contexts.len(),
            stats: self.stats.clone(),
        }
    }

    pub fn summary_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.summary())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════════

    /// `new A @ Main.main#3`
    fn object_display(&self, id: ObjId) -> String {
        let obj = self.object(id);
        format!(
            "new {} @ {}#{}",
            self.program.type_display(&obj.ty),
            self.program.method_display(obj.site.method),
            obj.site.index
        )
    }

    fn cs_objs_of(&self, key: &PointerKey) -> Vec<CsObj> {
        self.csm
            .find_pointer(key)
            .map(|p| {
                self.csm
                    .points_to_set(p)
                    .iter()
                    .map(|o| self.csm.cs_obj_of(o))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn ci_objs_of(&self, key: &PointerKey) -> Vec<ObjId> {
        self.project(self.csm.find_pointer(key).map(|p| self.csm.points_to_set(p)))
    }

    /// Drop heap contexts; sorted, deduplicated
    fn project<'a>(&self, sets: impl IntoIterator<Item = &'a PointsToSet>) -> Vec<ObjId> {
        let mut objs: Vec<ObjId> = sets
            .into_iter()
            .flat_map(|pts| pts.iter())
            .map(|o| self.csm.cs_obj_of(o).obj)
            .collect();
        objs.sort_unstable();
        objs.dedup();
        objs
    }
}

/// Serialisable analysis overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub selector: String,
    pub reachable_methods: Vec<String>,
    pub call_edges: Vec<CallEdgeSummary>,
    pub points_to: Vec<VarPointsTo>,
    pub objects: usize,
    pub cs_objects: usize,
    pub pointers: usize,
    pub pfg_edges: usize,
    pub contexts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SolverStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdgeSummary {
    pub caller: String,
    /// Statement index of the call inside `caller`
    pub stmt: usize,
    pub kind: CallKind,
    pub callee: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarPointsTo {
    pub method: String,
    pub var: String,
    pub objects: Vec<String>,
}
