//! Best-effort text lookups over an auxiliary corpus.
//!
//! Downstream tooling uses these to find how a function is used in test or
//! sample programs, and which constructor-style functions exist for a
//! struct. Nothing here feeds the knowledge graph. Finding nothing is a
//! normal outcome, reported as `None` or an empty list.

mod fs;

pub use fs::FsTextSearch;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::LookupConfig;

/// Errors that can occur while searching the corpus.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Invalid corpus glob '{glob}': {message}")]
    InvalidGlob { glob: String, message: String },
}

/// File access used by the lookup service.
///
/// Injected so lookups can run against an in-memory corpus in tests.
pub trait TextSearch: Send + Sync {
    /// Files under `root` matching any of `globs` (all files when empty),
    /// in a stable order.
    fn list_files(&self, root: &Path, globs: &[String]) -> Result<Vec<PathBuf>, LookupError>;

    /// Text of a file, `None` if it cannot be read.
    fn read(&self, path: &Path) -> Option<String>;
}

/// Usage-example and constructor search over a project tree.
pub struct LookupService<S: TextSearch = FsTextSearch> {
    root: PathBuf,
    config: LookupConfig,
    search: S,
}

impl LookupService<FsTextSearch> {
    /// Create a service searching the filesystem under `root`.
    pub fn new(root: impl Into<PathBuf>, config: LookupConfig) -> Self {
        Self::with_search(root, config, FsTextSearch::new())
    }
}

impl<S: TextSearch> LookupService<S> {
    /// Create a service with a custom file access backend.
    pub fn with_search(root: impl Into<PathBuf>, config: LookupConfig, search: S) -> Self {
        Self {
            root: root.into(),
            config,
            search,
        }
    }

    /// Context around `name` in the first corpus file mentioning it.
    ///
    /// Files are tried glob by glob, in configured order, each glob's matches
    /// in path order. The snippet is prefixed with `# From <file name>:` and
    /// capped at `snippet_limit` characters.
    pub fn find_usage_example(&self, name: &str) -> Result<Option<String>, LookupError> {
        if name.is_empty() {
            return Ok(None);
        }

        for file in self.corpus_files()? {
            let Some(content) = self.search.read(&file) else {
                tracing::warn!(path = %file.display(), "skipping unreadable corpus file");
                continue;
            };

            if let Some(snippet) =
                context_grep(&content, name, self.config.lines_before, self.config.lines_after)
            {
                let file_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let snippet = truncate_chars(&snippet, self.config.snippet_limit);
                return Ok(Some(format!("# From {}:\n{}", file_name, snippet)));
            }
        }

        tracing::debug!(function = name, "no usage example found");
        Ok(None)
    }

    /// Constructor names for `struct_name` that occur somewhere in the tree.
    ///
    /// Conventions without any occurrence are omitted. Results keep the
    /// configured convention order.
    pub fn find_constructor_candidates(
        &self,
        struct_name: &str,
    ) -> Result<Vec<String>, LookupError> {
        let candidates = self.render_conventions(struct_name);
        let mut found = vec![false; candidates.len()];

        for file in self.search.list_files(&self.root, &[])? {
            if found.iter().all(|f| *f) {
                break;
            }
            let Some(content) = self.search.read(&file) else {
                continue;
            };
            for (candidate, hit) in candidates.iter().zip(found.iter_mut()) {
                if !*hit && content.contains(candidate.as_str()) {
                    *hit = true;
                }
            }
        }

        Ok(candidates
            .into_iter()
            .zip(found)
            .filter_map(|(candidate, hit)| hit.then_some(candidate))
            .collect())
    }

    /// Constructor conventions rendered for `struct_name`, deduplicated.
    pub fn render_conventions(&self, struct_name: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.config
            .constructor_conventions
            .iter()
            .map(|c| {
                c.replace("{struct}", struct_name)
                    .replace("{prefix}", &self.config.prefix)
            })
            .filter(|c| seen.insert(c.clone()))
            .collect()
    }

    /// Usage corpus, glob by glob, without repeats.
    fn corpus_files(&self) -> Result<Vec<PathBuf>, LookupError> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for glob in &self.config.usage_globs {
            for file in self.search.list_files(&self.root, std::slice::from_ref(glob))? {
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        }

        Ok(files)
    }
}

/// Lines mentioning `needle` with `before`/`after` lines of context.
///
/// Overlapping or touching windows are merged; separate groups are divided
/// by a `--` line.
pub fn context_grep(content: &str, needle: &str, before: usize, after: usize) -> Option<String> {
    if needle.is_empty() {
        return None;
    }

    let lines: Vec<&str> = content.lines().collect();
    let mut groups: Vec<(usize, usize)> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !line.contains(needle) {
            continue;
        }
        let start = i.saturating_sub(before);
        let end = (i + after).min(lines.len() - 1);
        match groups.last_mut() {
            Some(last) if start <= last.1 + 1 => last.1 = last.1.max(end),
            _ => groups.push((start, end)),
        }
    }

    if groups.is_empty() {
        return None;
    }

    let mut output = String::new();
    for (n, (start, end)) in groups.iter().enumerate() {
        if n > 0 {
            output.push_str("--\n");
        }
        for line in &lines[*start..=*end] {
            output.push_str(line);
            output.push('\n');
        }
    }
    Some(output)
}

/// At most `limit` characters of `text`.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
