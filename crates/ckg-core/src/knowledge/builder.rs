//! Assembling function nodes from findings.

use futures::stream::{self, StreamExt};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use super::extractor::{
    definition_line, extract_signature_with_limit, headers_in, read_source, without_definition,
    CallExtractor, RegexCallExtractor, SourceLocator,
};
use super::graph::KnowledgeGraph;
use super::models::{BuildStats, Finding, FunctionNode, SourceSpan};
use crate::config::{
    ExtractionConfig, DEFAULT_CONTEXT_AFTER, DEFAULT_CONTEXT_BEFORE, DEFAULT_SIGNATURE_MAX_LINES,
    DEFAULT_WORKERS,
};

/// Builds a [`KnowledgeGraph`] from findings.
///
/// Each finding is extracted on the blocking pool, at most `workers` at a
/// time. Results are merged in input order, so "first writer" always means
/// first in the input, not first to finish.
pub struct GraphBuilder {
    locator: SourceLocator,
    call_extractor: Arc<dyn CallExtractor>,
    signature_max_lines: usize,
    workers: usize,
}

impl GraphBuilder {
    /// Create a builder with default window sizes and the regex call extractor.
    pub fn new() -> Self {
        Self {
            locator: SourceLocator::new(DEFAULT_CONTEXT_BEFORE, DEFAULT_CONTEXT_AFTER),
            call_extractor: Arc::new(RegexCallExtractor::new()),
            signature_max_lines: DEFAULT_SIGNATURE_MAX_LINES,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Create a builder from extraction settings.
    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            locator: SourceLocator::new(config.context_before, config.context_after),
            call_extractor: Arc::new(RegexCallExtractor::new()),
            signature_max_lines: config.signature_max_lines,
            workers: config.workers.max(1),
        }
    }

    /// Replace the call extractor.
    pub fn with_call_extractor(mut self, extractor: Arc<dyn CallExtractor>) -> Self {
        self.call_extractor = extractor;
        self
    }

    /// Set the number of concurrent extractions.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Extract one finding into a node. Never fails: problems produce a
    /// placeholder node carrying the failure message.
    pub fn extract(&self, finding: &Finding) -> FunctionNode {
        extract_node(
            &self.locator,
            self.call_extractor.as_ref(),
            self.signature_max_lines,
            finding,
        )
    }

    /// Build a new graph from `findings`.
    pub async fn build(&self, findings: Vec<Finding>) -> (KnowledgeGraph, BuildStats) {
        let mut graph = KnowledgeGraph::new();
        let stats = self.extend(&mut graph, findings).await;
        (graph, stats)
    }

    /// Add `findings` to an existing graph.
    ///
    /// Nodes are inserted one by one as results arrive, so dropping this
    /// future stops between findings and leaves only whole nodes behind.
    pub async fn extend(&self, graph: &mut KnowledgeGraph, findings: Vec<Finding>) -> BuildStats {
        let mut stats = BuildStats {
            findings: findings.len(),
            ..BuildStats::default()
        };

        // Names already claimed, either by the graph or earlier in this batch.
        let mut claimed = HashSet::new();
        let pending: Vec<Finding> = findings
            .into_iter()
            .filter(|f| {
                let fresh =
                    !graph.contains(&f.function_name) && claimed.insert(f.function_name.clone());
                if !fresh {
                    tracing::debug!(
                        function = %f.function_name,
                        "ignoring finding for known function"
                    );
                    stats.duplicates += 1;
                }
                fresh
            })
            .collect();

        let locator = self.locator;
        let max_lines = self.signature_max_lines;

        let mut results = stream::iter(pending.into_iter().map(|finding| {
            let extractor = Arc::clone(&self.call_extractor);
            let name = finding.function_name.clone();
            let path = finding.file_path.clone();

            let handle = tokio::task::spawn_blocking(move || {
                extract_node(&locator, extractor.as_ref(), max_lines, &finding)
            });

            async move {
                handle.await.unwrap_or_else(|e| {
                    tracing::warn!(function = %name, error = %e, "extraction task failed");
                    FunctionNode::placeholder(
                        name,
                        path,
                        BTreeSet::new(),
                        format!("extraction task failed: {}", e),
                    )
                })
            }
        }))
        .buffered(self.workers);

        while let Some(node) = results.next().await {
            let failed = !node.is_extracted();
            if graph.insert(node) {
                stats.inserted += 1;
                if failed {
                    stats.extraction_failures += 1;
                }
            } else {
                stats.duplicates += 1;
            }
        }

        stats.finished_at = Some(chrono::Utc::now());

        tracing::info!(
            findings = stats.findings,
            inserted = stats.inserted,
            duplicates = stats.duplicates,
            failures = stats.extraction_failures,
            "knowledge graph assembled"
        );

        stats
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_node(
    locator: &SourceLocator,
    call_extractor: &dyn CallExtractor,
    signature_max_lines: usize,
    finding: &Finding,
) -> FunctionNode {
    let name = &finding.function_name;
    let path = &finding.file_path;

    let content = match read_source(path) {
        Ok(content) => content,
        Err(failure) => {
            tracing::warn!(function = %name, error = %failure, "extraction failed");
            return FunctionNode::placeholder(name, path, BTreeSet::new(), failure.to_string());
        }
    };

    let headers = headers_in(&content);

    match locator.locate_in(path, &content, name, finding.line_hint) {
        Ok(span) => {
            let signature = extract_signature_with_limit(&span.text, name, signature_max_lines);
            let text = call_text(&span, name, signature_max_lines);
            let calls = call_extractor.extract_calls(&text);
            FunctionNode::extracted(name, span, headers, signature, calls)
        }
        Err(failure) => {
            tracing::warn!(function = %name, error = %failure, "extraction failed");
            FunctionNode::placeholder(name, path, headers, failure.to_string())
        }
    }
}

/// Text scanned for calls of `name`.
///
/// With a definition header in the window, lines above it belong to other
/// code and are left out; the header's own `name (` is removed either way.
fn call_text(span: &SourceSpan, name: &str, signature_max_lines: usize) -> String {
    match definition_line(&span.text, name, signature_max_lines) {
        Some(header) => {
            let tail: String = span.text.split_inclusive('\n').skip(header).collect();
            without_definition(&tail, 0, name)
        }
        None => {
            let anchor = (span.lines.anchor - span.lines.start) as usize;
            without_definition(&span.text, anchor, name)
        }
    }
}
