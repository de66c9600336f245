//! Knowledge graph error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while ingesting findings or querying the graph.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// Input rows lack a required column. Fatal to the whole batch.
    #[error("Format error: required column '{column}' is missing")]
    Format { column: String },

    /// No node with this name exists in the graph.
    #[error("Function not found: {0}")]
    NotFound(String),

    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Analyzer records could not be read.
    #[error("Record source error: {0}")]
    Csv(#[from] csv::Error),

    /// Graph snapshot (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KnowledgeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KnowledgeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is the normal "no such node" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, KnowledgeError::NotFound(_))
    }
}

/// A single finding's source could not be located.
///
/// Never aborts a build: the assembler records the message on a
/// placeholder node and moves on.
#[derive(Debug, Error)]
pub enum ExtractionFailure {
    /// The file could not be read (missing, permissions).
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but no line mentions the function.
    #[error("function '{name}' not found in {}", path.display())]
    NotLocated { path: PathBuf, name: String },
}
