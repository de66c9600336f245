//! Regex patterns and keywords for source extraction.

/// Pattern for call-like tokens: an identifier followed by `(`.
pub const CALL_PATTERN: &str = r"(?i)\b([a-z_][a-z0-9_]*)\s*\(";

/// C control-flow keywords that look like calls but aren't.
pub const CALL_KEYWORDS: &[&str] = &["if", "while", "for", "switch", "return", "sizeof"];

/// Preprocessor token that starts an include line.
pub const INCLUDE_DIRECTIVE: &str = "#include";

/// Pattern capturing the target of an include line.
pub const INCLUDE_PATTERN: &str = r#"#include\s+[<"]([^>"]+)[>"]"#;
