//! Default values for ckg configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Project Defaults
// ============================================================================

/// Default project root (the current directory).
pub const DEFAULT_PROJECT_ROOT: &str = ".";

/// Default category tag attached to every finding of a run.
pub const DEFAULT_CATEGORY: &str = "memory_leak";

/// Project-local config file name.
pub const DEFAULT_CONFIG_FILE: &str = "ckg.toml";

/// Directory under the user config dir holding `config.toml`.
pub const DEFAULT_CONFIG_DIR: &str = "ckg";

// ============================================================================
// Ingestion Defaults
// ============================================================================

/// Column holding the free-text location ("function 'x' ... line N").
pub const LOCATION_COLUMN: &str = "Start Line";

/// Column holding the tool-reported relative path.
pub const PATH_COLUMN: &str = "Path";

/// Column holding the query name.
pub const NAME_COLUMN: &str = "Name";

/// Cell indices in the analyzer's raw, headerless problem output.
pub const RAW_NAME_INDEX: usize = 0;
pub const RAW_LOCATION_INDEX: usize = 3;
pub const RAW_PATH_INDEX: usize = 4;

/// Path substrings excluded from the core graph (contrib trees, vendored
/// code, test harnesses).
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["/contrib/", "/vendor/", "/test", "pngtest"];

// ============================================================================
// Extraction Defaults
// ============================================================================

/// Lines kept before the anchor line.
pub const DEFAULT_CONTEXT_BEFORE: usize = 5;

/// Lines kept after the anchor line.
pub const DEFAULT_CONTEXT_AFTER: usize = 100;

/// Maximum number of lines joined into one signature.
pub const DEFAULT_SIGNATURE_MAX_LINES: usize = 10;

/// Default number of callees returned by `related`.
pub const DEFAULT_RELATED_LIMIT: usize = 5;

/// Default number of findings extracted concurrently.
pub const DEFAULT_WORKERS: usize = 8;

// ============================================================================
// Lookup Defaults
// ============================================================================

/// Corpus searched for usage examples.
pub const DEFAULT_USAGE_GLOBS: &[&str] = &["**/pngtest*.c", "contrib/**/*.c"];

/// Naming conventions for constructor-like functions.
pub const DEFAULT_CONSTRUCTOR_CONVENTIONS: &[&str] = &[
    "{struct}_init",
    "{struct}_create",
    "{prefix}_create_{struct}",
    "{prefix}_{struct}_init",
];

/// Library prefix substituted for `{prefix}` in constructor conventions.
pub const DEFAULT_LIBRARY_PREFIX: &str = "png";

/// Maximum characters of a usage snippet.
pub const DEFAULT_SNIPPET_LIMIT: usize = 500;

/// Context lines before a usage match.
pub const DEFAULT_LINES_BEFORE: usize = 2;

/// Context lines after a usage match.
pub const DEFAULT_LINES_AFTER: usize = 5;
