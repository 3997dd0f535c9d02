use crate::core::coupling::{module_metrics, ranked_above};
use crate::core::graph::DependencyGraph;
use crate::domain::model::{CoreModule, ImpactReport};

/// Fan-in or fan-out above this marks a core or high-risk module.
pub const IMPACT_THRESHOLD: usize = 3;
/// Number of core and high-risk modules reported.
pub const TOP_MODULES: usize = 5;

/// Rankings are stable: equal counts keep graph node order.
pub fn assess(graph: &DependencyGraph) -> ImpactReport {
    let modules = module_metrics(graph);

    let core_modules = ranked_above(&modules, IMPACT_THRESHOLD, |m| m.fan_in)
        .into_iter()
        .take(TOP_MODULES)
        .map(|(name, fan_in)| {
            let dependents = graph
                .node(&name)
                .map(|idx| {
                    graph
                        .dependents(idx)
                        .into_iter()
                        .map(|dep| graph.name(dep).to_string())
                        .collect()
                })
                .unwrap_or_default();
            CoreModule {
                name,
                fan_in,
                dependents,
            }
        })
        .collect();

    let high_risk = ranked_above(&modules, IMPACT_THRESHOLD, |m| m.fan_out)
        .into_iter()
        .take(TOP_MODULES)
        .collect();

    ImpactReport {
        core_modules,
        high_risk,
    }
}
