//! Configuration management for ckg.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `ckg.toml` file
//! 3. User config `~/.config/ckg/config.toml`
//! 4. Built-in defaults (lowest priority)
//!
//! Only the driver layer loads a [`Config`]. The pipeline types receive the
//! individual values at construction time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project root and finding classification.
    pub project: ProjectConfig,

    /// Path filtering applied after deduplication.
    pub filter: FilterConfig,

    /// Source extraction and graph assembly.
    pub extraction: ExtractionConfig,

    /// Auxiliary usage/constructor lookup.
    pub lookup: LookupConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./ckg.toml` (project local)
    /// 2. `~/.config/ckg/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_file(DEFAULT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(DEFAULT_CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("CKG_PROJECT_ROOT") {
            self.project.root = PathBuf::from(root);
        }
        if let Ok(category) = std::env::var("CKG_CATEGORY") {
            self.project.category = category;
        }
        if let Ok(workers) = std::env::var("CKG_WORKERS") {
            if let Ok(n) = workers.parse() {
                self.extraction.workers = n;
            }
        }
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extraction.workers == 0 {
            return Err(ConfigError::Invalid(
                "extraction.workers must be at least 1".to_string(),
            ));
        }
        if self.extraction.signature_max_lines == 0 {
            return Err(ConfigError::Invalid(
                "extraction.signature_max_lines must be at least 1".to_string(),
            ));
        }
        if let Some(bad) = self
            .lookup
            .constructor_conventions
            .iter()
            .find(|c| !c.contains("{struct}"))
        {
            return Err(ConfigError::Invalid(format!(
                "constructor convention '{}' has no {{struct}} placeholder",
                bad
            )));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Root that tool-reported relative paths are joined onto.
    pub root: PathBuf,

    /// Category tag attached to every finding of a run.
    pub category: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_PROJECT_ROOT),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// Finding filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Findings whose path contains any of these substrings are dropped.
    pub exclude_patterns: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Source extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lines kept before the anchor line.
    pub context_before: usize,

    /// Lines kept after the anchor line.
    pub context_after: usize,

    /// Maximum number of lines joined into one signature.
    pub signature_max_lines: usize,

    /// Number of callees returned by `related`.
    pub related_limit: usize,

    /// Number of findings extracted concurrently.
    pub workers: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            context_before: DEFAULT_CONTEXT_BEFORE,
            context_after: DEFAULT_CONTEXT_AFTER,
            signature_max_lines: DEFAULT_SIGNATURE_MAX_LINES,
            related_limit: DEFAULT_RELATED_LIMIT,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Auxiliary lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Globs (relative to the project root) searched for usage examples.
    pub usage_globs: Vec<String>,

    /// Constructor naming conventions with `{struct}` / `{prefix}` placeholders.
    pub constructor_conventions: Vec<String>,

    /// Value substituted for `{prefix}`.
    pub prefix: String,

    /// Maximum characters of a usage snippet.
    pub snippet_limit: usize,

    /// Context lines before a usage match.
    pub lines_before: usize,

    /// Context lines after a usage match.
    pub lines_after: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            usage_globs: DEFAULT_USAGE_GLOBS.iter().map(|s| s.to_string()).collect(),
            constructor_conventions: DEFAULT_CONSTRUCTOR_CONVENTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            prefix: DEFAULT_LIBRARY_PREFIX.to_string(),
            snippet_limit: DEFAULT_SNIPPET_LIMIT,
            lines_before: DEFAULT_LINES_BEFORE,
            lines_after: DEFAULT_LINES_AFTER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project.category, DEFAULT_CATEGORY);
        assert_eq!(config.extraction.context_after, DEFAULT_CONTEXT_AFTER);
        assert_eq!(config.lookup.prefix, DEFAULT_LIBRARY_PREFIX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[project]"));
        assert!(toml_str.contains("[filter]"));
        assert!(toml_str.contains("[extraction]"));
        assert!(toml_str.contains("[lookup]"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = Config::default();
        config.extraction.workers = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_convention_without_placeholder_rejected() {
        let mut config = Config::default();
        config.lookup.constructor_conventions.push("png_init".to_string());
        assert!(config.validate().is_err());
    }
}
