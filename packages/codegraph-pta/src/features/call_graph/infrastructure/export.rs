//! Call graph export (petgraph / Graphviz DOT)

use crate::features::call_graph::domain::{CallGraph, CallKind};
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Method-level petgraph view: one node per reachable method, one edge per
/// call edge (caller → callee), weighted by dispatch kind.
///
/// Call sites whose container is unknown are skipped.
pub fn to_petgraph<CS, M>(
    call_graph: &CallGraph<CS, M>,
    mut label: impl FnMut(M) -> String,
) -> DiGraph<String, CallKind>
where
    CS: Copy + Eq + Hash,
    M: Copy + Eq + Hash,
{
    let mut graph = DiGraph::new();
    let mut nodes: FxHashMap<M, NodeIndex> = FxHashMap::default();

    for m in call_graph.reachable_methods() {
        let idx = graph.add_node(label(*m));
        nodes.insert(*m, idx);
    }
    for edge in call_graph.edges() {
        let Some(caller) = call_graph.container_of(edge.call_site) else {
            continue;
        };
        let (Some(&from), Some(&to)) = (nodes.get(&caller), nodes.get(&edge.callee)) else {
            continue;
        };
        graph.add_edge(from, to, edge.kind);
    }
    graph
}

/// Render as Graphviz DOT
pub fn to_dot<CS, M>(call_graph: &CallGraph<CS, M>, label: impl FnMut(M) -> String) -> String
where
    CS: Copy + Eq + Hash,
    M: Copy + Eq + Hash,
{
    let graph = to_petgraph(call_graph, label);
    format!("{}", Dot::new(&graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::call_graph::domain::CallEdge;

    #[test]
    fn test_export_edges_between_methods() {
        let mut cg: CallGraph<u32, &str> = CallGraph::new();
        cg.add_reachable_method("main", [1, 2]);
        cg.add_reachable_method("foo", []);
        cg.add_edge(CallEdge::new(CallKind::Virtual, 1, "foo"));
        // Unknown call site is dropped
        cg.add_edge(CallEdge::new(CallKind::Static, 9, "foo"));

        let g = to_petgraph(&cg, |m| m.to_string());
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);

        let dot = to_dot(&cg, |m| m.to_string());
        assert!(dot.contains("digraph"));
        assert!(dot.contains("virtual"));
    }
}
