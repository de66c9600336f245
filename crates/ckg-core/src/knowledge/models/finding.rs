//! A reported location of interest.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One location reported by the upstream analyzer.
///
/// Created once by [`FindingParser`](crate::knowledge::ingest::FindingParser)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Function named in the location text.
    pub function_name: String,
    /// Project root joined with the tool-reported relative path.
    pub file_path: PathBuf,
    /// Approximate line from the location text; may be stale.
    pub line_hint: Option<u32>,
    /// Original location text.
    pub description: String,
    /// Classification tag of the run.
    pub category: String,
}

impl Finding {
    /// Create a new finding.
    pub fn new(
        function_name: impl Into<String>,
        file_path: impl Into<PathBuf>,
        line_hint: Option<u32>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            file_path: file_path.into(),
            line_hint,
            description: description.into(),
            category: category.into(),
        }
    }
}
