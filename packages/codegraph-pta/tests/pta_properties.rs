//! Property-based tests for the points-to solver
//!
//! Random straight-line programs over a handful of variables, checked for
//! invariants that must hold for every input:
//! - Monotonicity: points-to sets only grow while solving
//! - Closure: every PFG edge `s → t` has `pts(s) ⊆ pts(t)` at fixpoint
//! - Idempotence: re-adding a reachable method changes nothing
//! - Precision: context-sensitive results never exceed context-insensitive

mod common;

use codegraph_pta::config::{ContextStrategy, PTAConfig, Preset};
use codegraph_pta::features::points_to::{
    ContextId, PointerAnalysis, PointerAnalysisResult, PointerKey, PointsToSet, Solver,
};
use codegraph_pta::shared::models::{
    InvokeKind, MethodRef, Program, ProgramBuilder, Type, VarId,
};
use common::assert_pfg_sound;
use proptest::prelude::*;
use std::collections::BTreeSet;

const NUM_VARS: usize = 5;
const NUM_CLASSES: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    New(usize, usize),
    Copy(usize, usize),
    Store(usize, usize, usize),
    Load(usize, usize, usize),
    ArrayStore(usize, usize),
    ArrayLoad(usize, usize),
    StaticStore(usize),
    StaticLoad(usize),
    /// `r = Util.id(a)`
    CallStatic(usize, usize),
    /// `r = recv.keep(a)`
    CallVirtual(usize, usize, usize),
}

fn var() -> impl Strategy<Value = usize> {
    0..NUM_VARS
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (var(), 0..=NUM_CLASSES).prop_map(|(v, c)| Op::New(v, c)),
        3 => (var(), var()).prop_map(|(a, b)| Op::Copy(a, b)),
        2 => (var(), 0..2usize, var()).prop_map(|(b, f, r)| Op::Store(b, f, r)),
        2 => (var(), var(), 0..2usize).prop_map(|(l, b, f)| Op::Load(l, b, f)),
        1 => (var(), var()).prop_map(|(b, r)| Op::ArrayStore(b, r)),
        1 => (var(), var()).prop_map(|(l, b)| Op::ArrayLoad(l, b)),
        1 => var().prop_map(Op::StaticStore),
        1 => var().prop_map(Op::StaticLoad),
        2 => (var(), var()).prop_map(|(r, a)| Op::CallStatic(r, a)),
        2 => (var(), var(), var()).prop_map(|(r, recv, a)| Op::CallVirtual(r, recv, a)),
    ]
}

/// `NUM_CLASSES` plain classes plus `Keeper` (class index `NUM_CLASSES`),
/// whose `keep` stores its argument and returns it.
fn build_program(ops: &[Op]) -> Program {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    b.set_object_class(object);
    let classes: Vec<_> = (0..NUM_CLASSES)
        .map(|i| b.add_class(format!("C{}", i), Some(object)))
        .collect();
    let keeper = b.add_class("Keeper", Some(object));
    let util = b.add_class("Util", Some(object));
    let fields = [b.add_field(object, "f0", false), b.add_field(object, "f1", false)];
    let global = b.add_field(util, "g", true);

    let id = b.add_method(util, "Object id(Object)", true, &["p"]);
    let p = b.param(id, 0).unwrap();
    b.ret(id, Some(p));

    let keep = b.add_method(keeper, "Object keep(Object)", false, &["v"]);
    let keep_this = b.this_var(keep).unwrap();
    let v = b.param(keep, 0).unwrap();
    b.store_field(keep, keep_this, fields[0], v);
    b.ret(keep, Some(v));

    let main = b.add_method(util, "void main()", true, &[]);
    let vars: Vec<_> = (0..NUM_VARS).map(|i| b.var(main, &format!("v{}", i))).collect();
    let id_ref = MethodRef::new(util, "Object id(Object)");
    let keep_ref = MethodRef::new(keeper, "Object keep(Object)");

    for op in ops {
        match *op {
            Op::New(v, c) => {
                let class = classes.get(c).copied().unwrap_or(keeper);
                b.new_object(main, vars[v], Type::Class(class));
            }
            Op::Copy(l, r) => b.copy(main, vars[l], vars[r]),
            Op::Store(base, f, r) => b.store_field(main, vars[base], fields[f], vars[r]),
            Op::Load(l, base, f) => b.load_field(main, vars[l], vars[base], fields[f]),
            Op::ArrayStore(base, r) => b.store_array(main, vars[base], vars[r]),
            Op::ArrayLoad(l, base) => b.load_array(main, vars[l], vars[base]),
            Op::StaticStore(r) => b.store_static(main, global, vars[r]),
            Op::StaticLoad(l) => b.load_static(main, vars[l], global),
            Op::CallStatic(r, a) => {
                b.invoke(main, InvokeKind::Static, id_ref.clone(), None, &[vars[a]], Some(vars[r]));
            }
            Op::CallVirtual(r, recv, a) => {
                b.invoke(
                    main,
                    InvokeKind::Virtual,
                    keep_ref.clone(),
                    Some(vars[recv]),
                    &[vars[a]],
                    Some(vars[r]),
                );
            }
        }
    }
    b.add_entry_method(main);
    b.build().unwrap()
}

fn analysis(context: ContextStrategy) -> PointerAnalysis {
    PointerAnalysis::new(PTAConfig::from_preset(Preset::Custom).context(context)).unwrap()
}

fn strategies() -> impl Strategy<Value = ContextStrategy> {
    prop_oneof![
        Just(ContextStrategy::Insensitive),
        (1..=2usize).prop_map(|k| ContextStrategy::CallSite { k }),
        (1..=2usize).prop_map(|k| ContextStrategy::Object { k }),
        (1..=2usize).prop_map(|k| ContextStrategy::Type { k }),
    ]
}

/// Allocation sites `var` may point to, as `(method, stmt)` pairs
fn sites_of(result: &PointerAnalysisResult<'_>, var: VarId) -> BTreeSet<(usize, usize)> {
    result
        .points_to(var)
        .into_iter()
        .map(|o| {
            let site = result.object(o).site;
            (site.method.index(), site.index)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_points_to_sets_grow_monotonically(
        ops in prop::collection::vec(op(), 1..40),
        context in strategies(),
    ) {
        let program = build_program(&ops);
        let mut solver = analysis(context).solver(&program);
        solver.initialize().unwrap();

        let snapshot = |s: &Solver<'_>| -> Vec<PointsToSet> {
            s.cs_manager().pointers().map(|(p, _)| s.points_to_set(p).clone()).collect()
        };
        let mut before = snapshot(&solver);
        while solver.step().unwrap() {
            let after = snapshot(&solver);
            prop_assert!(after.len() >= before.len());
            for (old, new) in before.iter().zip(&after) {
                prop_assert!(old.is_subset(new));
            }
            before = after;
        }
        prop_assert_eq!(solver.pending(), 0);
    }

    #[test]
    fn prop_fixpoint_closes_pfg_edges(
        ops in prop::collection::vec(op(), 1..40),
        context in strategies(),
    ) {
        let program = build_program(&ops);
        let mut solver = analysis(context).solver(&program);
        solver.solve().unwrap();
        assert_pfg_sound(&solver);

        // Entry method variables live in the empty context only
        let main = program.entry_methods()[0];
        for (_, ctx, v) in solver.cs_manager().cs_vars() {
            if program.var(v).method == main {
                prop_assert_eq!(ctx, ContextId::EMPTY);
            }
        }
    }

    #[test]
    fn prop_add_reachable_is_idempotent(
        ops in prop::collection::vec(op(), 1..30),
        context in strategies(),
    ) {
        let program = build_program(&ops);
        let mut solver = analysis(context).solver(&program);
        solver.solve().unwrap();

        let reachable = solver.call_graph().num_reachable_methods();
        let edges = solver.call_graph().num_edges();
        let pfg_edges = solver.pfg().num_edges();
        let pointers = solver.cs_manager().num_pointers();

        let main = program.entry_methods()[0];
        let entry = solver.cs_method(ContextId::EMPTY, main);
        solver.add_reachable(entry).unwrap();
        solver.initialize().unwrap();
        while solver.step().unwrap() {}

        prop_assert_eq!(solver.call_graph().num_reachable_methods(), reachable);
        prop_assert_eq!(solver.call_graph().num_edges(), edges);
        prop_assert_eq!(solver.pfg().num_edges(), pfg_edges);
        prop_assert_eq!(solver.cs_manager().num_pointers(), pointers);
    }

    #[test]
    fn prop_context_sensitivity_refines_insensitive(
        ops in prop::collection::vec(op(), 1..40),
        context in strategies(),
    ) {
        let program = build_program(&ops);
        let ci = analysis(ContextStrategy::Insensitive).analyze(&program).unwrap();
        let cs = analysis(context).analyze(&program).unwrap();

        for (var, _) in program.vars() {
            let precise = sites_of(&cs, var);
            let merged = sites_of(&ci, var);
            prop_assert!(
                precise.is_subset(&merged),
                "{}: {:?} not within {:?}",
                program.var_display(var),
                precise,
                merged
            );
        }
        for edge in cs.ci_call_graph().edges() {
            prop_assert!(ci.ci_call_graph().contains_edge(edge));
        }
    }
}

#[test]
fn test_pfg_edge_added_once() {
    let program = build_program(&[Op::New(0, 0), Op::Copy(1, 0)]);
    let mut solver = analysis(ContextStrategy::Insensitive).solver(&program);
    solver.solve().unwrap();

    let main = program.entry_methods()[0];
    let v0 = program.find_var(main, "v0").unwrap();
    let v2 = program.find_var(main, "v2").unwrap();
    let source = solver.pointer(PointerKey::Var { context: ContextId::EMPTY, var: v0 });
    let target = solver.pointer(PointerKey::Var { context: ContextId::EMPTY, var: v2 });
    let before = solver.pfg().num_edges();

    assert!(solver.add_pfg_edge(source, target));
    assert!(!solver.add_pfg_edge(source, target));
    assert_eq!(solver.pfg().num_edges(), before + 1);

    // The new edge carries v0's object on the next steps
    assert_eq!(solver.pending(), 1);
    while solver.step().unwrap() {}
    assert_eq!(solver.points_to_set(target), solver.points_to_set(source));
    assert_pfg_sound(&solver);
}
