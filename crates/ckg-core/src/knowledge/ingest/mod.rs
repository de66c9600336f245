//! Turning analyzer records into findings.
//!
//! The analyzer reports locations as free text such as
//! `function 'png_create_read_struct' defined, see line 412`. Rows without a
//! `function '<name>'` fragment are dropped; rows without a `line <n>`
//! fragment keep a `None` line hint.

mod source;

pub use source::{CsvRecords, RawAnalyzerCsv, Record, RecordSource};

use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::config::{LOCATION_COLUMN, PATH_COLUMN};
use crate::knowledge::error::KnowledgeError;
use crate::knowledge::models::Finding;

static FUNCTION_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"function '([^']+)'").expect("valid function fragment regex"));

static LINE_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"line (\d+)").expect("valid line fragment regex"));

/// Parses analyzer records into [`Finding`]s rooted at a project directory.
#[derive(Debug, Clone)]
pub struct FindingParser {
    project_root: PathBuf,
    category: String,
}

impl FindingParser {
    /// Create a parser resolving paths against `project_root`.
    pub fn new(project_root: impl Into<PathBuf>, category: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            category: category.into(),
        }
    }

    /// Parse all rows.
    ///
    /// Fails with [`KnowledgeError::Format`] when the first row lacks the
    /// location or path column. Later rows that cannot be parsed are skipped.
    pub fn parse(&self, rows: &[Record]) -> Result<Vec<Finding>, KnowledgeError> {
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };

        for column in [LOCATION_COLUMN, PATH_COLUMN] {
            if !first.contains_key(column) {
                return Err(KnowledgeError::Format {
                    column: column.to_string(),
                });
            }
        }

        let findings: Vec<Finding> = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let finding = self.parse_row(row);
                if finding.is_none() {
                    tracing::debug!(row = index, "dropping row without a function fragment");
                }
                finding
            })
            .collect();

        tracing::debug!(rows = rows.len(), findings = findings.len(), "parsed analyzer rows");
        Ok(findings)
    }

    /// Parse one row, `None` if it names no function.
    pub fn parse_row(&self, row: &Record) -> Option<Finding> {
        let location = row.get(LOCATION_COLUMN)?;
        let relative_path = row.get(PATH_COLUMN)?;

        let function_name = parse_function_name(location)?;
        let line_hint = parse_line_hint(location);

        Some(Finding::new(
            function_name,
            resolve_path(&self.project_root, relative_path),
            line_hint,
            location.clone(),
            self.category.clone(),
        ))
    }
}

/// Extract `<name>` from a `function '<name>'` fragment.
pub fn parse_function_name(location: &str) -> Option<String> {
    FUNCTION_FRAGMENT
        .captures(location)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract `<n>` from a `line <n>` fragment.
pub fn parse_line_hint(location: &str) -> Option<u32> {
    LINE_FRAGMENT
        .captures(location)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Join a tool-reported path onto the project root.
///
/// Leading separators are stripped so the join never turns into an
/// absolute-path override.
pub fn resolve_path(project_root: &Path, relative_path: &str) -> PathBuf {
    project_root.join(relative_path.trim_start_matches(['/', '\\']))
}

/// Keep the first finding per function name, in input order.
pub fn deduplicate(findings: Vec<Finding>) -> Vec<Finding> {
    let mut seen = HashSet::new();
    let unique: Vec<Finding> = findings
        .into_iter()
        .filter(|f| seen.insert(f.function_name.clone()))
        .collect();

    tracing::info!(unique = unique.len(), "deduplicated findings");
    unique
}

/// Drop findings whose path contains any of `exclude_patterns`.
///
/// Plain substring containment: `/test` also excludes `/src/testing.c`.
pub fn filter_core<S: AsRef<str>>(findings: Vec<Finding>, exclude_patterns: &[S]) -> Vec<Finding> {
    let patterns: Vec<&str> = exclude_patterns.iter().map(|p| p.as_ref()).collect();

    findings
        .into_iter()
        .filter(|f| {
            let path = f.file_path.to_string_lossy();
            match patterns.iter().find(|p| path.contains(**p)) {
                Some(pattern) => {
                    tracing::debug!(
                        function = %f.function_name,
                        pattern = *pattern,
                        "excluding finding outside the core tree"
                    );
                    false
                }
                None => true,
            }
        })
        .collect()
}
