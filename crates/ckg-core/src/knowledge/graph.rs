//! The in-memory function knowledge graph.
//!
//! Edges are implicit: a callee name in a node's `calls` set. Callees without
//! a node of their own ("dangling" edges) are normal.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::error::KnowledgeError;
use super::models::{FunctionNode, GraphStats};

/// Mapping from function name to [`FunctionNode`].
///
/// The first node inserted under a name wins; later inserts are rejected.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    nodes: HashMap<String, FunctionNode>,
    /// Names in insertion order.
    order: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    nodes: Vec<FunctionNode>,
}

impl KnowledgeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns `false`, leaving the graph untouched, if a node
    /// with the same name already exists.
    pub fn insert(&mut self, node: FunctionNode) -> bool {
        if self.nodes.contains_key(&node.name) {
            return false;
        }
        self.order.push(node.name.clone());
        self.nodes.insert(node.name.clone(), node);
        true
    }

    /// Look up a node by name.
    pub fn get(&self, name: &str) -> Result<&FunctionNode, KnowledgeError> {
        self.nodes
            .get(name)
            .ok_or_else(|| KnowledgeError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FunctionNode> {
        self.order.iter().filter_map(|name| self.nodes.get(name))
    }

    /// Up to `limit` callees of `name`.
    ///
    /// Callees are kept as a set; the prefix returned is in lexical order.
    pub fn related(&self, name: &str, limit: usize) -> Result<Vec<String>, KnowledgeError> {
        Ok(self.get(name)?.calls.iter().take(limit).cloned().collect())
    }

    /// Names of nodes whose calls include `name`, in insertion order.
    pub fn callers(&self, name: &str) -> Vec<String> {
        self.iter()
            .filter(|node| node.calls.contains(name))
            .map(|node| node.name.clone())
            .collect()
    }

    /// Callees of `name` that have a node in this graph.
    pub fn resolved_calls(&self, name: &str) -> Result<Vec<String>, KnowledgeError> {
        Ok(self
            .get(name)?
            .calls
            .iter()
            .filter(|callee| self.contains(callee))
            .cloned()
            .collect())
    }

    /// Callees of `name` with no node in this graph.
    pub fn dangling_calls(&self, name: &str) -> Result<Vec<String>, KnowledgeError> {
        Ok(self
            .get(name)?
            .calls
            .iter()
            .filter(|callee| !self.contains(callee))
            .cloned()
            .collect())
    }

    /// Render everything known about `name` for a prompt.
    pub fn context_for(&self, name: &str) -> Result<String, KnowledgeError> {
        let node = self.get(name)?;
        let mut result = String::new();

        result.push_str(&format!("## Function `{}`\n\n", node.name));
        result.push_str(&format!("- File: {}\n", node.file_path.display()));
        result.push_str(&format!("- Signature: `{}`\n", node.signature));
        if let Some(span) = node.span {
            result.push_str(&format!("- Lines: {}-{}\n", span.start, span.end));
        }
        if let Some(error) = &node.extraction_error {
            result.push_str(&format!("- Extraction failed: {}\n", error));
        }

        if !node.headers.is_empty() {
            result.push_str("\n### Headers\n\n");
            for header in &node.headers {
                result.push_str(&format!("- {}\n", header));
            }
        }

        if !node.calls.is_empty() {
            result.push_str("\n### Calls\n\n");
            for callee in &node.calls {
                let marker = if self.contains(callee) { "" } else { " (external)" };
                result.push_str(&format!("- {}{}\n", callee, marker));
            }
        }

        if !node.source_text.is_empty() {
            result.push_str("\n### Source\n\n```c\n");
            result.push_str(&node.source_text);
            if !node.source_text.ends_with('\n') {
                result.push('\n');
            }
            result.push_str("```\n");
        }

        Ok(result)
    }

    /// Counts over the current nodes.
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            nodes: self.len(),
            ..GraphStats::default()
        };

        for node in self.nodes.values() {
            if node.is_extracted() {
                stats.extracted += 1;
            } else {
                stats.placeholders += 1;
            }
            stats.call_edges += node.calls.len();
            stats.dangling_edges += node.calls.iter().filter(|c| !self.contains(c)).count();
        }

        stats
    }

    /// Serialize all nodes, in insertion order.
    pub fn to_json(&self) -> Result<String, KnowledgeError> {
        let snapshot = Snapshot {
            nodes: self.iter().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Rebuild a graph from [`to_json`](Self::to_json) output.
    pub fn from_json(json: &str) -> Result<Self, KnowledgeError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let mut graph = Self::new();
        for node in snapshot.nodes {
            graph.insert(node);
        }
        Ok(graph)
    }

    /// Write a JSON snapshot to `path`.
    pub fn save(&self, path: &Path) -> Result<(), KnowledgeError> {
        fs::write(path, self.to_json()?).map_err(|e| KnowledgeError::io(path, e))
    }

    /// Read a JSON snapshot from `path`.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let json = fs::read_to_string(path).map_err(|e| KnowledgeError::io(path, e))?;
        Self::from_json(&json)
    }
}
