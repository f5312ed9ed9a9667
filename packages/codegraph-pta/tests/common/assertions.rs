//! Custom assertions for points-to results

use codegraph_pta::features::points_to::{PointerAnalysisResult, Solver};
use codegraph_pta::shared::models::VarId;
use pretty_assertions::assert_eq;

/// Allocated type names of the objects `var` points to, sorted
pub fn pts_classes(result: &PointerAnalysisResult<'_>, var: VarId) -> Vec<String> {
    let program = result.program();
    let mut names: Vec<String> = result
        .points_to(var)
        .into_iter()
        .map(|o| program.type_display(&result.object(o).ty))
        .collect();
    names.sort();
    names
}

pub fn assert_points_to_classes(result: &PointerAnalysisResult<'_>, var: VarId, expected: &[&str]) {
    let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    assert_eq!(
        pts_classes(result, var),
        expected,
        "points-to set of {}",
        result.program().var_display(var)
    );
}

/// `Class.method` names of the reachable methods, sorted
pub fn reachable_names(result: &PointerAnalysisResult<'_>) -> Vec<String> {
    let program = result.program();
    let mut names: Vec<String> = result
        .reachable_methods()
        .iter()
        .map(|m| program.method_display(*m))
        .collect();
    names.sort();
    names
}

/// Every PFG edge `s → t` satisfies `pts(s) ⊆ pts(t)`
pub fn assert_pfg_sound(solver: &Solver<'_>) {
    for &(s, t) in solver.pfg().edges() {
        let source = solver.points_to_set(s);
        let target = solver.points_to_set(t);
        assert!(
            source.is_subset(target),
            "PFG edge {} -> {} not closed: {:?} ⊄ {:?}",
            solver.cs_manager().pointer_key(s),
            solver.cs_manager().pointer_key(t),
            source,
            target
        );
    }
}
