//! Source-grounded function knowledge graph for C codebases.
//!
//! Ingests static-analysis findings, locates each named function in its
//! source file, and assembles signature, include set and outgoing calls into
//! a queryable [`KnowledgeGraph`].

pub mod config;
pub mod knowledge;
pub mod lookup;

pub use config::{Config, ConfigError, ExtractionConfig, FilterConfig, LookupConfig, ProjectConfig};
pub use knowledge::{
    prepare_findings, BuildStats, Finding, FindingParser, FunctionNode, GraphBuilder, GraphStats,
    KnowledgeError, KnowledgeGraph,
};
pub use lookup::{FsTextSearch, LookupError, LookupService, TextSearch};
