//! Elementary cycle enumeration (Johnson's algorithm).
//!
//! Strongly connected components come from `petgraph::algo::tarjan_scc`; the
//! circuit search runs inside one component at a time, removing the start node
//! after each round. Self-loops are reported first as length-1 cycles.

use crate::core::graph::DependencyGraph;
use crate::domain::model::Cycle;
use crate::utils::error::{AnalyzerError, Result};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Enumeration stops with an error beyond this many cycles.
pub const DEFAULT_CYCLE_LIMIT: usize = 100_000;

pub struct CycleDetector {
    limit: usize,
}

impl CycleDetector {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_CYCLE_LIMIT,
        }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }

    pub fn find_cycles(&self, graph: &DependencyGraph) -> Result<Vec<Cycle>> {
        let cycles = self.simple_cycles(graph.graph())?;
        Ok(cycles
            .into_iter()
            .map(|cycle| cycle.into_iter().map(|idx| graph.name(idx).to_string()).collect())
            .collect())
    }

    fn simple_cycles(&self, graph: &DiGraph<String, ()>) -> Result<Vec<Vec<NodeIndex>>> {
        let mut cycles = Vec::new();

        for idx in graph.node_indices() {
            if graph.contains_edge(idx, idx) {
                self.push_cycle(&mut cycles, vec![idx])?;
            }
        }

        let all: HashSet<NodeIndex> = graph.node_indices().collect();
        let mut pending: Vec<HashSet<NodeIndex>> = components(graph, &all);

        while let Some(mut scc) = pending.pop() {
            let Some(&start) = scc.iter().min() else {
                continue;
            };
            self.circuits_from(graph, start, &scc, &mut cycles)?;

            scc.remove(&start);
            pending.extend(components(graph, &scc));
        }

        Ok(cycles)
    }

    /// One round of Johnson's circuit search rooted at `start`.
    fn circuits_from(
        &self,
        graph: &DiGraph<String, ()>,
        start: NodeIndex,
        scc: &HashSet<NodeIndex>,
        cycles: &mut Vec<Vec<NodeIndex>>,
    ) -> Result<()> {
        let successors = |node: NodeIndex| -> Vec<NodeIndex> {
            graph
                .neighbors(node)
                .filter(|next| *next != node && scc.contains(next))
                .collect()
        };

        let mut path = vec![start];
        let mut blocked: HashSet<NodeIndex> = HashSet::from([start]);
        let mut closed: HashSet<NodeIndex> = HashSet::new();
        let mut blocked_by: HashMap<NodeIndex, HashSet<NodeIndex>> = HashMap::new();
        let mut stack: Vec<(NodeIndex, Vec<NodeIndex>)> = vec![(start, successors(start))];

        while let Some((_, nbrs)) = stack.last_mut() {
            if let Some(next) = nbrs.pop() {
                if next == start {
                    self.push_cycle(cycles, path.clone())?;
                    closed.extend(path.iter().copied());
                } else if !blocked.contains(&next) {
                    path.push(next);
                    stack.push((next, successors(next)));
                    closed.remove(&next);
                    blocked.insert(next);
                    continue;
                }
            }

            let Some((node, nbrs)) = stack.last() else {
                break;
            };
            if nbrs.is_empty() {
                let node = *node;
                if closed.contains(&node) {
                    unblock(node, &mut blocked, &mut blocked_by);
                } else {
                    for nbr in successors(node) {
                        blocked_by.entry(nbr).or_default().insert(node);
                    }
                }
                stack.pop();
                path.pop();
            }
        }

        Ok(())
    }

    fn push_cycle(&self, cycles: &mut Vec<Vec<NodeIndex>>, cycle: Vec<NodeIndex>) -> Result<()> {
        if cycles.len() >= self.limit {
            return Err(AnalyzerError::CycleDetectionError {
                message: format!("more than {} simple cycles, enumeration aborted", self.limit),
            });
        }
        cycles.push(cycle);
        Ok(())
    }
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn unblock(
    node: NodeIndex,
    blocked: &mut HashSet<NodeIndex>,
    blocked_by: &mut HashMap<NodeIndex, HashSet<NodeIndex>>,
) {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        if blocked.remove(&node) {
            if let Some(waiting) = blocked_by.get_mut(&node) {
                stack.extend(waiting.drain());
            }
        }
    }
}

/// Non-trivial strongly connected components of the subgraph induced by `keep`.
fn components(graph: &DiGraph<String, ()>, keep: &HashSet<NodeIndex>) -> Vec<HashSet<NodeIndex>> {
    let sub = graph.filter_map(
        |idx, _| keep.contains(&idx).then_some(idx),
        |edge, _| match graph.edge_endpoints(edge) {
            Some((from, to)) if from != to => Some(()),
            _ => None,
        },
    );

    tarjan_scc(&sub)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| scc.into_iter().map(|i| sub[i]).collect())
        .collect()
}
