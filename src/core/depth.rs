//! Dependency chain depth.
//!
//! Depth between two modules is the edge count of the longest simple path
//! between them, found by enumerating simple paths of at most
//! [`MAX_PATH_EDGES`] edges. Longest simple path is NP-hard in general, so the
//! cutoff, the node sample size and the entry point limit are fixed.

use crate::core::graph::DependencyGraph;
use crate::domain::model::{DepthReport, EntryPointDepth};
use crate::utils::error::{AnalyzerError, Result};
use petgraph::algo::all_simple_paths;
use petgraph::graph::NodeIndex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Paths longer than this many edges are not enumerated.
pub const MAX_PATH_EDGES: usize = 10;
/// At most this many nodes are sampled for the global maximum.
pub const SAMPLE_SIZE: usize = 20;
/// Only this many entry points are reported individually.
pub const ENTRY_POINT_LIMIT: usize = 5;
pub const DEFAULT_PATH_BUDGET: usize = 10_000_000;

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub struct DepthEstimator {
    path_budget: usize,
}

impl DepthEstimator {
    pub fn new() -> Self {
        Self {
            path_budget: DEFAULT_PATH_BUDGET,
        }
    }

    /// Caps how many simple paths one estimation run may enumerate in total.
    pub fn with_path_budget(path_budget: usize) -> Self {
        Self { path_budget }
    }

    pub fn estimate(&self, graph: &DependencyGraph, rng: &mut StdRng) -> Result<DepthReport> {
        let mut budget = self.path_budget;

        let max_depth = self.sampled_max_depth(graph, rng, &mut budget)?;

        let entry_points = graph.entry_points();
        let mut reported = Vec::new();
        for &entry in entry_points.iter().take(ENTRY_POINT_LIMIT) {
            let depth = self.max_depth_from(graph, entry, &mut budget)?;
            reported.push(EntryPointDepth {
                module: graph.name(entry).to_string(),
                depth,
            });
        }

        tracing::debug!(
            "Depth estimation used {} of {} path budget",
            self.path_budget - budget,
            self.path_budget
        );

        Ok(DepthReport {
            max_depth,
            entry_points: reported,
            total_entry_points: entry_points.len(),
        })
    }

    /// Maximum depth over all ordered pairs of a random node sample.
    pub fn sampled_max_depth(
        &self,
        graph: &DependencyGraph,
        rng: &mut StdRng,
        budget: &mut usize,
    ) -> Result<usize> {
        let nodes: Vec<NodeIndex> = graph.nodes().collect();
        let sample: Vec<NodeIndex> = if nodes.len() > SAMPLE_SIZE {
            nodes.choose_multiple(rng, SAMPLE_SIZE).copied().collect()
        } else {
            nodes
        };

        let mut max_length = 0;
        for &source in &sample {
            for &target in &sample {
                if source == target {
                    continue;
                }
                if let Some(length) = self.longest_path(graph, source, target, budget)? {
                    max_length = max_length.max(length);
                }
            }
        }
        Ok(max_length)
    }

    /// Maximum depth from `source` to any other module.
    pub fn max_depth_from(
        &self,
        graph: &DependencyGraph,
        source: NodeIndex,
        budget: &mut usize,
    ) -> Result<usize> {
        let mut max_length = 0;
        for target in graph.nodes() {
            if target == source {
                continue;
            }
            if let Some(length) = self.longest_path(graph, source, target, budget)? {
                max_length = max_length.max(length);
            }
        }
        Ok(max_length)
    }

    /// Edge count of the longest simple path `from` → `to` within the cutoff,
    /// or `None` when no such path exists.
    pub fn longest_path(
        &self,
        graph: &DependencyGraph,
        from: NodeIndex,
        to: NodeIndex,
        budget: &mut usize,
    ) -> Result<Option<usize>> {
        let mut longest = None;
        let paths = all_simple_paths::<Vec<NodeIndex>, _>(
            graph.graph(),
            from,
            to,
            0,
            Some(MAX_PATH_EDGES - 1),
        );
        for path in paths {
            if *budget == 0 {
                return Err(AnalyzerError::PathEnumerationError {
                    message: format!(
                        "exceeded the budget of {} enumerated paths",
                        self.path_budget
                    ),
                });
            }
            *budget -= 1;
            let length = path.len() - 1;
            longest = Some(longest.map_or(length, |current: usize| current.max(length)));
        }
        Ok(longest)
    }
}

impl Default for DepthEstimator {
    fn default() -> Self {
        Self::new()
    }
}
