//! Include-set extraction.

use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use super::locator::read_source;
use super::patterns::{INCLUDE_DIRECTIVE, INCLUDE_PATTERN};

static INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(INCLUDE_PATTERN).expect("valid include regex"));

/// Include targets of the file at `file_path`; empty if it can't be read.
pub fn extract_headers(file_path: &Path) -> BTreeSet<String> {
    match read_source(file_path) {
        Ok(content) => headers_in(&content),
        Err(e) => {
            tracing::debug!(error = %e, "no headers for unreadable file");
            BTreeSet::new()
        }
    }
}

/// Include targets (`<x.h>` or `"x.h"`) of already-read source.
pub fn headers_in(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .filter(|line| line.trim().starts_with(INCLUDE_DIRECTIVE))
        .filter_map(|line| INCLUDE.captures(line))
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_in() {
        let source = "\
#include \"pngpriv.h\"
  #include <stdlib.h>
#include <stdlib.h>
// #include <commented.h>
#define X 1
";
        let headers = headers_in(source);
        assert_eq!(
            headers,
            BTreeSet::from(["pngpriv.h".to_string(), "stdlib.h".to_string()])
        );
    }

    #[test]
    fn test_unreadable_file_has_no_headers() {
        assert!(extract_headers(Path::new("/definitely/not/here.c")).is_empty());
    }
}
