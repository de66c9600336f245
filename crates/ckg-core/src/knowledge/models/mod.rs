//! Data models for the knowledge graph.

mod finding;
mod node;
mod stats;

pub use finding::Finding;
pub use node::{fallback_signature, FunctionNode, LineSpan, SourceSpan};
pub use stats::{BuildStats, GraphStats};
