//! Deriving a function signature from an extracted window.

use super::calls::definition_range;
use crate::config::DEFAULT_SIGNATURE_MAX_LINES;
use crate::knowledge::models::fallback_signature;

/// Signature of `function_name` found in `span_text`.
///
/// Starts at the definition header (see [`definition_line`]), or else at the
/// first line mentioning the name before a `(`, joins up to
/// [`DEFAULT_SIGNATURE_MAX_LINES`] lines until one contains `{`, and cuts at
/// the first `{`. Falls back to `<unknown> name(...)`.
pub fn extract_signature(span_text: &str, function_name: &str) -> String {
    extract_signature_with_limit(span_text, function_name, DEFAULT_SIGNATURE_MAX_LINES)
}

/// [`extract_signature`] with a custom line cap.
pub fn extract_signature_with_limit(
    span_text: &str,
    function_name: &str,
    max_lines: usize,
) -> String {
    let lines: Vec<&str> = span_text.lines().collect();

    let start = definition_line(span_text, function_name, max_lines).or_else(|| {
        lines
            .iter()
            .position(|line| mentions_call_of(line, function_name))
    });
    let Some(start) = start else {
        return fallback_signature(function_name);
    };

    let mut signature_lines = Vec::new();
    for line in lines.iter().skip(start).take(max_lines.max(1)) {
        signature_lines.push(*line);
        if line.contains('{') {
            break;
        }
    }

    let joined = signature_lines.join(" ");
    let head = joined.split('{').next().unwrap_or_default();
    head.trim().to_string()
}

/// 0-based line of the definition header of `function_name` in `span_text`.
///
/// A header is a whole-identifier `name (` whose following text reaches a `{`
/// before any `;` within `max_lines` lines. Prototypes, calls and comments
/// mentioning the name do not qualify.
pub fn definition_line(span_text: &str, function_name: &str, max_lines: usize) -> Option<usize> {
    let lines: Vec<&str> = span_text.lines().collect();

    (0..lines.len()).find(|&i| {
        let Some((_, end)) = definition_range(lines[i], function_name) else {
            return false;
        };
        let following = std::iter::once(&lines[i][end..])
            .chain(lines[i + 1..].iter().copied())
            .take(max_lines.max(1));

        for text in following {
            if let Some(pos) = text.find(|c| c == '{' || c == ';') {
                return text.as_bytes()[pos] == b'{';
            }
        }
        false
    })
}

/// `name` occurs with a `(` somewhere after it.
fn mentions_call_of(line: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    line.find(name)
        .map(|i| line[i + name.len()..].contains('('))
        .unwrap_or(false)
}
