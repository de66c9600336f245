//! Filesystem-backed corpus access.

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use super::{LookupError, TextSearch};

/// Walks the project tree like `grep -r`: hidden and ignored files are
/// included, only the `.git` directory is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsTextSearch;

impl FsTextSearch {
    pub fn new() -> Self {
        Self
    }
}

impl TextSearch for FsTextSearch {
    fn list_files(&self, root: &Path, globs: &[String]) -> Result<Vec<PathBuf>, LookupError> {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .filter_entry(|entry| entry.file_name() != ".git");

        if !globs.is_empty() {
            let mut overrides = OverrideBuilder::new(root);
            for glob in globs {
                overrides.add(glob).map_err(|e| LookupError::InvalidGlob {
                    glob: glob.clone(),
                    message: e.to_string(),
                })?;
            }
            let overrides = overrides.build().map_err(|e| LookupError::InvalidGlob {
                glob: globs.join(", "),
                message: e.to_string(),
            })?;
            builder.overrides(overrides);
        }

        let mut files: Vec<PathBuf> = builder
            .build()
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.into_path())
            .collect();

        files.sort();
        Ok(files)
    }

    fn read(&self, path: &Path) -> Option<String> {
        std::fs::read(path)
            .ok()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}
