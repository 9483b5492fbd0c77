//! Titlecheck Audit - stored title vs. document title reconciliation
//!
//! Streams a CSV of `(identifier, storedTitle, createdAt)` records, looks up
//! each identifier's cleaned XML document in a content store, extracts the
//! document's declared title and writes `(identifier, storedTitle,
//! extractedTitle)` rows for human review.
//!
//! # Features
//!
//! - Single pass, one record in memory at a time
//! - Missing documents are skipped and counted; every other failure aborts
//! - Streaming XML parsing with quick-xml
//!
//! # Example
//!
//! ```ignore
//! use titlecheck_audit::{Config, run};
//!
//! let config = Config {
//!     input_file: "titles.csv".into(),
//!     max_records: Some(100),
//!     ..Default::default()
//! };
//!
//! let summary = run(&config, &indicatif::ProgressBar::hidden())?;
//! println!("Processed {} records", summary.processed);
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod reader;
pub mod record;
pub mod runner;
pub mod store;
pub mod writer;

// Re-exports
pub use config::Config;
pub use error::{AuditError, DocumentError, InputError, LookupError, QuoteError};
pub use parser::{ParsedDocument, extract_title};
pub use reader::RecordReader;
pub use record::{InputRecord, OutputRow};
pub use runner::{RecordOutcome, SkipReason, Summary, compare_titles, run};
pub use store::{ContentBlob, ContentStore, FsContentStore, content_key};
pub use writer::ResultWriter;
