//! Function knowledge graph over a C codebase.
//!
//! Turns analyzer findings into source-grounded function nodes:
//! - **Ingestion** of analyzer rows into [`Finding`]s, deduplicated and
//!   filtered to the core tree
//! - **Extraction** of a context window, signature, include set and callees
//!   per finding, using line/token matching rather than a compiler front end
//! - **Assembly** into a [`KnowledgeGraph`] keyed by function name
//!
//! # Pipeline
//!
//! ```text
//! rows -> FindingParser -> deduplicate -> filter_core -> GraphBuilder -> KnowledgeGraph
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ckg_core::knowledge::{prepare_findings, CsvRecords, FindingParser, GraphBuilder, RecordSource};
//!
//! let rows = CsvRecords::new("results.csv").records()?;
//! let parser = FindingParser::new("/src/libpng", "memory_leak");
//! let findings = prepare_findings(&parser, &rows, &["/contrib/", "/test"])?;
//!
//! let (graph, stats) = GraphBuilder::new().build(findings).await;
//! println!("{}", graph.context_for("png_create_read_struct")?);
//! ```

mod builder;
mod error;
pub mod extractor;
mod graph;
pub mod ingest;
pub mod models;

pub use builder::GraphBuilder;
pub use error::{ExtractionFailure, KnowledgeError};
pub use extractor::{CallExtractor, ExtractorCapability, RegexCallExtractor, SourceLocator};
pub use graph::KnowledgeGraph;
pub use ingest::{
    deduplicate, filter_core, CsvRecords, FindingParser, RawAnalyzerCsv, Record, RecordSource,
};
pub use models::{BuildStats, Finding, FunctionNode, GraphStats, LineSpan, SourceSpan};

/// Parse rows, keep the first finding per function, drop excluded paths.
pub fn prepare_findings<S: AsRef<str>>(
    parser: &FindingParser,
    rows: &[Record],
    exclude_patterns: &[S],
) -> Result<Vec<Finding>, KnowledgeError> {
    let findings = parser.parse(rows)?;
    let parsed = findings.len();
    let core = filter_core(deduplicate(findings), exclude_patterns);

    tracing::info!(parsed, retained = core.len(), "prepared findings");
    Ok(core)
}
