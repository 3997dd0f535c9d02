//! Module dependency graph built from an import map.
//!
//! Edges point from importer to imported module (A → B means A imports B).
//! Parallel imports collapse into one edge, but fan-out keeps the raw length
//! of each module's `imports` list.

use crate::utils::error::{AnalyzerError, Result, PREVIEW_CHARS};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde_json::Value;
use std::collections::HashMap;

pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    name_to_node: HashMap<String, NodeIndex>,
    fan_out: HashMap<NodeIndex, usize>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_to_node: HashMap::new(),
            fan_out: HashMap::new(),
        }
    }

    /// Parse raw JSON bytes into a graph.
    ///
    /// Decode failures carry the first 500 characters of the input so the
    /// caller can show what was actually in the file.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let document: Value = serde_json::from_slice(bytes).map_err(|source| {
            let preview: String = String::from_utf8_lossy(bytes)
                .chars()
                .take(PREVIEW_CHARS)
                .collect();
            AnalyzerError::JsonDecodeError { source, preview }
        })?;
        Self::from_document(&document)
    }

    pub fn from_document(document: &Value) -> Result<Self> {
        let modules = document
            .as_object()
            .ok_or_else(|| AnalyzerError::InvalidInputError {
                message: format!(
                    "expected a JSON object of modules at the top level, found {}",
                    json_kind(document)
                ),
            })?;

        let mut graph = Self::new();
        for (module_name, module_data) in modules {
            graph.add_module(module_name);

            // imports 缺少或格式不對時視為沒有依賴
            let Some(imports) = module_data.get("imports").and_then(Value::as_array) else {
                continue;
            };
            let targets: Vec<&str> = imports.iter().filter_map(Value::as_str).collect();
            if targets.len() != imports.len() {
                tracing::warn!(
                    "⚠️ {}: ignoring {} non-string import entries",
                    module_name,
                    imports.len() - targets.len()
                );
            }
            graph.add_imports(module_name, &targets);
        }

        tracing::debug!(
            "Built dependency graph with {} modules and {} edges",
            graph.module_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    pub fn add_module(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.name_to_node.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.name_to_node.insert(name.to_string(), idx);
        idx
    }

    /// Register `imports` of `module`. Fan-out grows by the list length,
    /// duplicates included; the edge set only ever holds one edge per pair.
    pub fn add_imports(&mut self, module: &str, imports: &[&str]) {
        let from = self.add_module(module);
        *self.fan_out.entry(from).or_insert(0) += imports.len();
        for imported in imports {
            let to = self.add_module(imported);
            self.graph.update_edge(from, to, ());
        }
    }

    pub fn graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    pub fn node(&self, name: &str) -> Option<NodeIndex> {
        self.name_to_node.get(name).copied()
    }

    pub fn name(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in insertion order: document keys first-seen, then import targets.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Number of distinct modules importing `idx`.
    pub fn fan_in(&self, idx: NodeIndex) -> usize {
        self.in_degree(idx)
    }

    /// Length of the module's own `imports` list.
    pub fn fan_out(&self, idx: NodeIndex) -> usize {
        self.fan_out.get(&idx).copied().unwrap_or(0)
    }

    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_directed(idx, Direction::Incoming).count()
    }

    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_directed(idx, Direction::Outgoing).count()
    }

    /// Direct importers of `idx`, oldest edge first.
    pub fn dependents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut dependents: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect();
        // petgraph 以最新的邊優先，反轉回加入順序
        dependents.reverse();
        dependents
    }

    /// Modules with zero in-degree.
    pub fn entry_points(&self) -> Vec<NodeIndex> {
        self.nodes().filter(|&idx| self.in_degree(idx) == 0).collect()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
