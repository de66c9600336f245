//! Producers of analyzer records.
//!
//! The analyzer itself is never invoked from here; a [`RecordSource`] only
//! hands over rows it already produced.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::config::{
    LOCATION_COLUMN, NAME_COLUMN, PATH_COLUMN, RAW_LOCATION_INDEX, RAW_NAME_INDEX, RAW_PATH_INDEX,
};
use crate::knowledge::error::KnowledgeError;

/// One analyzer row: column name to cell text.
pub type Record = HashMap<String, String>;

/// Anything that can hand over analyzer rows.
pub trait RecordSource {
    /// Read all rows.
    fn records(&self) -> Result<Vec<Record>, KnowledgeError>;
}

impl RecordSource for Vec<Record> {
    fn records(&self) -> Result<Vec<Record>, KnowledgeError> {
        Ok(self.clone())
    }
}

/// CSV file with a header row (`Name,Path,Start Line`).
#[derive(Debug, Clone)]
pub struct CsvRecords {
    path: PathBuf,
}

impl CsvRecords {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read headed records from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Record>, KnowledgeError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut records = Vec::new();

        for result in reader.records() {
            let row = result?;
            let record: Record = headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect();
            records.push(record);
        }

        Ok(records)
    }
}

impl RecordSource for CsvRecords {
    fn records(&self) -> Result<Vec<Record>, KnowledgeError> {
        let file = File::open(&self.path).map_err(|e| KnowledgeError::io(&self.path, e))?;
        Self::from_reader(file)
    }
}

/// Headerless output of the analyzer's problem queries.
///
/// Cells 0, 4 and 3 are re-projected into the `Name`, `Path` and
/// `Start Line` columns; shorter rows are skipped.
#[derive(Debug, Clone)]
pub struct RawAnalyzerCsv {
    path: PathBuf,
}

impl RawAnalyzerCsv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Re-project raw rows from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Record>, KnowledgeError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let min_cells = RAW_PATH_INDEX.max(RAW_LOCATION_INDEX).max(RAW_NAME_INDEX) + 1;
        let mut records = Vec::new();

        for result in reader.records() {
            let row = result?;
            if row.len() < min_cells {
                tracing::debug!(cells = row.len(), "skipping short analyzer row");
                continue;
            }

            let cell = |i: usize| row.get(i).unwrap_or_default().to_string();
            records.push(Record::from([
                (NAME_COLUMN.to_string(), cell(RAW_NAME_INDEX)),
                (PATH_COLUMN.to_string(), cell(RAW_PATH_INDEX)),
                (LOCATION_COLUMN.to_string(), cell(RAW_LOCATION_INDEX)),
            ]));
        }

        Ok(records)
    }
}

impl RecordSource for RawAnalyzerCsv {
    fn records(&self) -> Result<Vec<Record>, KnowledgeError> {
        let file = File::open(&self.path).map_err(|e| KnowledgeError::io(&self.path, e))?;
        Self::from_reader(file)
    }
}
