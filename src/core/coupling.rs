use crate::core::graph::DependencyGraph;
use crate::domain::model::{CouplingReport, ModuleCoupling};

/// More than this many dependents marks a module as high fan-in.
pub const HIGH_FAN_IN_THRESHOLD: usize = 3;
/// More than this many imports marks a module as high fan-out.
pub const HIGH_FAN_OUT_THRESHOLD: usize = 5;

/// Fan-in and fan-out of every module, in graph node order.
pub fn module_metrics(graph: &DependencyGraph) -> Vec<ModuleCoupling> {
    graph
        .nodes()
        .map(|idx| ModuleCoupling {
            name: graph.name(idx).to_string(),
            fan_in: graph.fan_in(idx),
            fan_out: graph.fan_out(idx),
        })
        .collect()
}

pub fn analyze(graph: &DependencyGraph) -> CouplingReport {
    let mut modules = module_metrics(graph);

    let high_fan_in = ranked_above(&modules, HIGH_FAN_IN_THRESHOLD, |m| m.fan_in);
    let high_fan_out = ranked_above(&modules, HIGH_FAN_OUT_THRESHOLD, |m| m.fan_out);

    modules.sort_by(|a, b| a.name.cmp(&b.name));

    CouplingReport {
        modules,
        high_fan_in,
        high_fan_out,
    }
}

/// Modules whose metric strictly exceeds `threshold`, highest first.
/// Ties keep graph node order.
pub fn ranked_above(
    modules: &[ModuleCoupling],
    threshold: usize,
    metric: impl Fn(&ModuleCoupling) -> usize,
) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = modules
        .iter()
        .map(|m| (m.name.clone(), metric(m)))
        .filter(|(_, count)| *count > threshold)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
