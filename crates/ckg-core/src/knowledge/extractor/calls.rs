//! Call-edge extraction.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use super::patterns::{CALL_KEYWORDS, CALL_PATTERN};

static CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CALL_PATTERN).expect("valid call regex"));

/// Extracts callee names from source text.
///
/// Implement this to replace the lexical approximation with a real
/// tokenizer or AST walker; the assembler only sees this trait.
pub trait CallExtractor: Send + Sync {
    /// Deduplicated callee names found in `source`.
    fn extract_calls(&self, source: &str) -> BTreeSet<String>;

    /// How deeply this extractor understands the source.
    fn capability(&self) -> ExtractorCapability {
        ExtractorCapability::Lexical
    }
}

/// Level of call extraction capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExtractorCapability {
    /// Token pattern matching; macros look like calls, function pointers are invisible.
    Lexical,
    /// Parsed syntax; macros still unexpanded.
    Syntactic,
    /// Preprocessed and type-resolved call targets.
    Semantic,
}

impl std::fmt::Display for ExtractorCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexical => write!(f, "Lexical"),
            Self::Syntactic => write!(f, "Syntactic"),
            Self::Semantic => write!(f, "Semantic"),
        }
    }
}

/// Regex-based extractor: `identifier (` minus control-flow keywords.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexCallExtractor;

impl RegexCallExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl CallExtractor for RegexCallExtractor {
    fn extract_calls(&self, source: &str) -> BTreeSet<String> {
        extract_calls(source)
    }
}

/// Callee names in `source`, control-flow keywords excluded.
pub fn extract_calls(source: &str) -> BTreeSet<String> {
    CALL.captures_iter(source)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .filter(|name| !CALL_KEYWORDS.contains(name))
        .map(str::to_string)
        .collect()
}

/// `text` with the defining `name (` on line `anchor` (0-based) removed.
///
/// The definition header itself is not a call; later occurrences, including
/// recursive calls on the same line, are kept.
pub fn without_definition(text: &str, anchor: usize, name: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for (i, line) in text.split_inclusive('\n').enumerate() {
        match (i == anchor).then(|| definition_range(line, name)).flatten() {
            Some((start, end)) => {
                output.push_str(&line[..start]);
                output.push_str(&line[end..]);
            }
            None => output.push_str(line),
        }
    }
    output
}

/// Byte range of the first `name` + optional whitespace + `(` in `line` that
/// is a whole identifier.
pub(super) fn definition_range(line: &str, name: &str) -> Option<(usize, usize)> {
    if name.is_empty() {
        return None;
    }
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';

    for (start, _) in line.match_indices(name) {
        if line[..start].chars().next_back().is_some_and(is_ident) {
            continue;
        }
        let rest = &line[start + name.len()..];
        let trimmed = rest.trim_start();
        if trimmed.starts_with('(') {
            let end = line.len() - trimmed.len() + 1;
            return Some((start, end));
        }
    }
    None
}
