//! Class Hierarchy Analysis (CHA) call graph builder
//!
//! Resolves every call site from its declared type alone:
//! - static: declared lookup up the superclass chain
//! - special: dispatch on the declaring class
//! - virtual/interface: dispatch on the declaring class and on every
//!   transitive subclass, subinterface and implementor
//!
//! The result over-approximates the call graph found by points-to
//! analysis, which only dispatches on classes that are actually allocated.

use crate::features::call_graph::domain::{CallEdge, CallGraph, CallKind};
use crate::features::class_hierarchy::ClassHierarchy;
use crate::shared::models::{InvokeId, MethodId};
use std::collections::VecDeque;
use tracing::debug;

/// Context-insensitive call graph over program entities
pub type MethodCallGraph = CallGraph<InvokeId, MethodId>;

/// CHA call graph builder
pub struct ChaBuilder<'h, 'p> {
    hierarchy: &'h ClassHierarchy<'p>,
}

impl<'h, 'p> ChaBuilder<'h, 'p> {
    pub fn new(hierarchy: &'h ClassHierarchy<'p>) -> Self {
        Self { hierarchy }
    }

    /// Build from the program's entry methods
    pub fn build(&self) -> MethodCallGraph {
        let program = self.hierarchy.program();
        self.build_from(program.entry_methods())
    }

    /// Build from explicit entry methods
    pub fn build_from(&self, entries: &[MethodId]) -> MethodCallGraph {
        let program = self.hierarchy.program();
        let mut call_graph = MethodCallGraph::new();
        let mut worklist: VecDeque<MethodId> = VecDeque::new();
        for entry in entries {
            call_graph.add_entry_method(*entry);
            worklist.push_back(*entry);
        }

        while let Some(method) = worklist.pop_front() {
            let sites: Vec<InvokeId> = program.invokes_in(method).collect();
            if !call_graph.add_reachable_method(method, sites.iter().copied()) {
                continue;
            }
            for cs in sites {
                let kind = CallKind::of(program.invoke(cs));
                for target in self.resolve(cs) {
                    call_graph.add_edge(CallEdge::new(kind, cs, target));
                    worklist.push_back(target);
                }
            }
        }

        debug!(
            "CHA call graph: {} reachable methods, {} edges",
            call_graph.num_reachable_methods(),
            call_graph.num_edges()
        );
        call_graph
    }

    /// Possible targets of a call site
    pub fn resolve(&self, call_site: InvokeId) -> Vec<MethodId> {
        let invoke = self.hierarchy.program().invoke(call_site);
        let method_ref = &invoke.method_ref;
        let subsig = &method_ref.subsignature;

        let mut targets = Vec::new();
        match CallKind::of(invoke) {
            CallKind::Static => targets.extend(self.hierarchy.resolve_static(method_ref)),
            CallKind::Special => targets.extend(self.hierarchy.resolve_special(method_ref)),
            CallKind::Virtual | CallKind::Interface => {
                for class in self.hierarchy.all_subtypes_of(method_ref.class) {
                    if let Some(m) = self.hierarchy.dispatch(class, subsig) {
                        if !targets.contains(&m) {
                            targets.push(m);
                        }
                    }
                }
            }
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{InvokeKind, MethodRef, ProgramBuilder, Type};

    #[test]
    fn test_cha_virtual_includes_all_overrides() {
        let mut b = ProgramBuilder::new();
        let object = b.add_class("Object", None);
        let a = b.add_class("A", Some(object));
        let bb = b.add_class("B", Some(a));
        let c = b.add_class("C", Some(a));
        let a_foo = b.add_method(a, "void foo()", false, &[]);
        let b_foo = b.add_method(bb, "void foo()", false, &[]);
        let _ = c;
        let main = b.add_method(object, "void main()", true, &[]);
        let x = b.var(main, "x");
        b.new_object(main, x, Type::Class(a));
        let cs = b.invoke(main, InvokeKind::Virtual, MethodRef::new(a, "void foo()"), Some(x), &[], None);
        b.add_entry_method(main);
        let p = b.build().unwrap();

        let h = ClassHierarchy::new(&p);
        let cg = ChaBuilder::new(&h).build();

        // C inherits A.foo, so exactly two distinct targets
        assert_eq!(cg.callees_of(cs), &[a_foo, b_foo]);
        assert!(cg.contains(b_foo));
        assert_eq!(cg.num_reachable_methods(), 3);
    }

    #[test]
    fn test_cha_static_chain() {
        let mut b = ProgramBuilder::new();
        let k = b.add_class("K", None);
        let main = b.add_method(k, "void main()", true, &[]);
        let f = b.add_method(k, "void f()", true, &[]);
        let g = b.add_method(k, "void g()", true, &[]);
        b.invoke(main, InvokeKind::Static, MethodRef::new(k, "void f()"), None, &[], None);
        b.invoke(f, InvokeKind::Static, MethodRef::new(k, "void g()"), None, &[], None);
        b.invoke(g, InvokeKind::Static, MethodRef::new(k, "void f()"), None, &[], None);
        b.add_entry_method(main);
        let p = b.build().unwrap();

        let h = ClassHierarchy::new(&p);
        let cg = ChaBuilder::new(&h).build();
        assert_eq!(cg.reachable_methods(), &[main, f, g]);
        assert_eq!(cg.num_edges(), 3);
        assert!(cg.edges().iter().all(|e| e.kind == CallKind::Static));
    }
}
