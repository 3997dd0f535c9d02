use crate::core::graph::DependencyGraph;

/// Modules with neither incoming nor outgoing edges, in node order.
pub fn isolated_modules(graph: &DependencyGraph) -> Vec<String> {
    graph
        .nodes()
        .filter(|&idx| graph.in_degree(idx) == 0 && graph.out_degree(idx) == 0)
        .map(|idx| graph.name(idx).to_string())
        .collect()
}
