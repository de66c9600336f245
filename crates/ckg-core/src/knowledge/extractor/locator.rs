//! Locating a function's definition in its source file.
//!
//! Matching is purely textual. A definition-looking line (trimmed line
//! starting with `name` then optional whitespace and `(`) is preferred; any
//! line mentioning the name is the fallback. The returned window is a fixed
//! number of lines around the match, not a brace-balanced body, so very long
//! functions may be cut off.

use std::fs;
use std::path::Path;

use crate::config::{DEFAULT_CONTEXT_AFTER, DEFAULT_CONTEXT_BEFORE};
use crate::knowledge::error::ExtractionFailure;
use crate::knowledge::models::{LineSpan, SourceSpan};

/// Finds the context window for a named function.
#[derive(Debug, Clone, Copy)]
pub struct SourceLocator {
    context_before: usize,
    context_after: usize,
}

impl SourceLocator {
    /// Create a locator with custom window sizes.
    pub fn new(context_before: usize, context_after: usize) -> Self {
        Self {
            context_before,
            context_after,
        }
    }

    /// Read `file_path` and locate `function_name` in it.
    pub fn locate(
        &self,
        file_path: &Path,
        function_name: &str,
        line_hint: Option<u32>,
    ) -> Result<SourceSpan, ExtractionFailure> {
        let content = read_source(file_path)?;
        self.locate_in(file_path, &content, function_name, line_hint)
    }

    /// Locate `function_name` in already-read `content`.
    pub fn locate_in(
        &self,
        file_path: &Path,
        content: &str,
        function_name: &str,
        line_hint: Option<u32>,
    ) -> Result<SourceSpan, ExtractionFailure> {
        let lines: Vec<&str> = content.split_inclusive('\n').collect();

        let anchor = find_anchor(&lines, function_name, line_hint).ok_or_else(|| {
            ExtractionFailure::NotLocated {
                path: file_path.to_path_buf(),
                name: function_name.to_string(),
            }
        })?;

        // anchor is 1-based; the window is lines[anchor - before, anchor + after)
        let start_idx = anchor.saturating_sub(self.context_before);
        let end_idx = (anchor + self.context_after).min(lines.len());

        Ok(SourceSpan {
            file_path: file_path.to_path_buf(),
            lines: LineSpan {
                start: (start_idx + 1) as u32,
                end: end_idx as u32,
                anchor: anchor as u32,
            },
            text: lines[start_idx..end_idx].concat(),
        })
    }
}

impl Default for SourceLocator {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_BEFORE, DEFAULT_CONTEXT_AFTER)
    }
}

/// Read a source file, replacing invalid UTF-8.
pub fn read_source(path: &Path) -> Result<String, ExtractionFailure> {
    let bytes = fs::read(path).map_err(|source| ExtractionFailure::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 1-based line of the best match for `name`.
///
/// Among several definition-looking lines the one closest to `line_hint`
/// wins (earliest on ties); without a hint the first one wins.
fn find_anchor(lines: &[&str], name: &str, line_hint: Option<u32>) -> Option<usize> {
    if name.is_empty() {
        return None;
    }

    let definitions: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_definition_line(line, name))
        .map(|(i, _)| i + 1)
        .collect();

    let best = match line_hint {
        Some(hint) => definitions
            .iter()
            .copied()
            .min_by_key(|&line| line.abs_diff(hint as usize)),
        None => definitions.first().copied(),
    };

    best.or_else(|| {
        lines
            .iter()
            .position(|line| line.contains(name))
            .map(|i| i + 1)
    })
}

/// `name (` at the start of the trimmed line, `name` not being a prefix of a
/// longer identifier.
fn is_definition_line(line: &str, name: &str) -> bool {
    line.trim_start()
        .strip_prefix(name)
        .map(|rest| rest.trim_start().starts_with('('))
        .unwrap_or(false)
}
