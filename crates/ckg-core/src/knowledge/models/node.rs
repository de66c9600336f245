//! Node types for the knowledge graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// 1-based, inclusive line range of an extracted context window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    /// First line of the window.
    pub start: u32,
    /// Last line of the window.
    pub end: u32,
    /// Line the function name was matched on.
    pub anchor: u32,
}

/// Context window located for one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpan {
    /// File the window was read from.
    pub file_path: PathBuf,
    /// Line range of the window.
    pub lines: LineSpan,
    /// Window text, original line endings kept.
    pub text: String,
}

/// A function node in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionNode {
    /// Function name, unique within a graph.
    pub name: String,
    /// File of the triggering finding.
    pub file_path: PathBuf,
    /// Extracted context window; empty when extraction failed.
    pub source_text: String,
    /// Include targets of the containing file.
    pub headers: BTreeSet<String>,
    /// Derived signature, or `<unknown> name(...)`.
    pub signature: String,
    /// Callee names found in `source_text`.
    pub calls: BTreeSet<String>,
    /// Where `source_text` came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<LineSpan>,
    /// Why extraction failed, for placeholder nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

impl FunctionNode {
    /// Node for a successfully located function.
    pub fn extracted(
        name: impl Into<String>,
        span: SourceSpan,
        headers: BTreeSet<String>,
        signature: impl Into<String>,
        calls: BTreeSet<String>,
    ) -> Self {
        Self {
            name: name.into(),
            file_path: span.file_path,
            source_text: span.text,
            headers,
            signature: signature.into(),
            calls,
            span: Some(span.lines),
            extraction_error: None,
        }
    }

    /// Node recorded after an extraction failure.
    pub fn placeholder(
        name: impl Into<String>,
        file_path: impl Into<PathBuf>,
        headers: BTreeSet<String>,
        error: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            signature: fallback_signature(&name),
            name,
            file_path: file_path.into(),
            source_text: String::new(),
            headers,
            calls: BTreeSet::new(),
            span: None,
            extraction_error: Some(error.into()),
        }
    }

    /// Whether the function's source was located.
    pub fn is_extracted(&self) -> bool {
        self.extraction_error.is_none()
    }

    /// Whether the function calls itself.
    pub fn is_recursive(&self) -> bool {
        self.calls.contains(&self.name)
    }
}

/// Signature used when none can be derived.
pub fn fallback_signature(name: &str) -> String {
    format!("<unknown> {}(...)", name)
}
