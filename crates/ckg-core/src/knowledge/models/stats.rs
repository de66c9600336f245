//! Build and graph statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome counters for one assembly run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildStats {
    /// Findings handed to the builder.
    pub findings: usize,
    /// Nodes inserted into the graph.
    pub inserted: usize,
    /// Findings rejected because their name was already present.
    pub duplicates: usize,
    /// Inserted nodes whose source could not be located.
    pub extraction_failures: usize,
    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,
}

/// Shape of a graph at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of function nodes.
    pub nodes: usize,
    /// Nodes with located source.
    pub extracted: usize,
    /// Nodes recorded after an extraction failure.
    pub placeholders: usize,
    /// Total call edges over all nodes.
    pub call_edges: usize,
    /// Call edges whose callee has no node.
    pub dangling_edges: usize,
}
