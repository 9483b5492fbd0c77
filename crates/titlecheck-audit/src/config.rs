//! Title audit run configuration

use std::path::PathBuf;

/// Runtime configuration for one audit run
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV with `identifier,storedTitle,createdAt` rows (header required)
    pub input_file: PathBuf,
    /// Result CSV, created or truncated before writing
    pub output_file: PathBuf,
    /// Directory holding `<identifier>.xml` documents
    pub content_root: PathBuf,
    /// Stop after this many input records (written + skipped).
    /// `None` or `Some(0)` means no limit.
    pub max_records: Option<usize>,
}

impl Config {
    /// Effective processing cap, with `Some(0)` folded into "unbounded".
    pub fn processing_cap(&self) -> Option<usize> {
        self.max_records.filter(|&n| n > 0)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("input.csv"),
            output_file: PathBuf::from("output.csv"),
            content_root: PathBuf::from("data/content"),
            max_records: None,
        }
    }
}
