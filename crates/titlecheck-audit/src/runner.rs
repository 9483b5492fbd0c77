//! Main runner for the title audit

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use titlecheck_core::fmt_num;

use crate::config::Config;
use crate::error::AuditError;
use crate::parser::extract_title;
use crate::reader::RecordReader;
use crate::record::{InputRecord, OutputRow};
use crate::store::{ContentStore, FsContentStore};
use crate::writer::ResultWriter;

/// Why a record produced no output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing stored under the record's content key
    ContentNotFound { key: String },
}

/// Result of processing one input record that did not abort the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Row written; `mismatch` is true when the titles differ
    Written { mismatch: bool },
    Skipped(SkipReason),
}

/// Run execution summary
#[derive(Debug, Default, Clone)]
pub struct Summary {
    /// Input records examined, written and skipped alike
    pub processed: usize,
    pub written: usize,
    pub skipped: usize,
    /// Written rows whose stored title differs from the document title
    pub mismatched: usize,
    pub elapsed: Duration,
}

impl Summary {
    fn record(&mut self, outcome: &RecordOutcome) {
        self.processed += 1;
        match outcome {
            RecordOutcome::Written { mismatch } => {
                self.written += 1;
                if *mismatch {
                    self.mismatched += 1;
                }
            }
            RecordOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Resolve, extract and write one record.
///
/// `line` is the record's 1-based position, used in error messages.
fn process_record<S, W>(
    line: usize,
    record: InputRecord,
    store: &S,
    writer: &mut ResultWriter<W>,
) -> Result<RecordOutcome, AuditError>
where
    S: ContentStore + ?Sized,
    W: Write,
{
    let blob = match store.lookup(&record.identifier) {
        Ok(blob) => blob,
        Err(e) if e.is_not_found() => {
            let key = e.key().to_string();
            log::warn!("Content not found for {} ({key}), skipping", record.identifier);
            return Ok(RecordOutcome::Skipped(SkipReason::ContentNotFound { key }));
        }
        Err(source) => {
            return Err(AuditError::StoreUnavailable {
                line,
                identifier: record.identifier,
                source,
            });
        }
    };

    let doc = match extract_title(blob.as_bytes()) {
        Ok(doc) => doc,
        Err(source) => {
            return Err(AuditError::MalformedDocument {
                line,
                identifier: record.identifier,
                source,
            });
        }
    };
    drop(blob);

    let row = OutputRow::new(record, doc.title);
    writer.write_row(line, &row)?;
    log::debug!(
        "{}: stored={:?} extracted={:?}",
        row.identifier,
        row.stored_title,
        row.extracted_title
    );

    Ok(RecordOutcome::Written {
        mismatch: row.is_mismatch(),
    })
}

/// Compare stored titles in `source` against document titles from `store`,
/// writing result rows to `destination`.
///
/// Stops after `cap` records when set. Rows written before a fatal error are
/// still flushed to `destination`.
pub fn compare_titles<R, W, S>(
    source: R,
    destination: W,
    store: &S,
    cap: Option<usize>,
    pb: &ProgressBar,
) -> Result<Summary, AuditError>
where
    R: Read,
    W: Write,
    S: ContentStore + ?Sized,
{
    let start = Instant::now();
    let mut records = RecordReader::new(source)?;

    let mut writer = ResultWriter::new(destination);
    writer.write_header()?;

    let mut summary = Summary::default();

    for record in records.by_ref() {
        let record = record?;
        let line = summary.processed + 1;
        pb.set_message(record.identifier.clone());

        let outcome = process_record(line, record, store, &mut writer)?;
        summary.record(&outcome);
        pb.inc(1);

        if cap.is_some_and(|cap| summary.processed >= cap) {
            log::info!("Processing cap of {} records reached", fmt_num(summary.processed));
            break;
        }
    }

    let rows_written = writer.rows_written();
    writer.finish()?;
    log::debug!(
        "Read {} input records, wrote {} rows",
        fmt_num(records.records_read()),
        fmt_num(rows_written)
    );
    summary.elapsed = start.elapsed();
    Ok(summary)
}

/// Run the title audit described by `config`
pub fn run(config: &Config, pb: &ProgressBar) -> Result<Summary> {
    log::info!("Title comparison started: {config:?}");

    if !config.content_root.is_dir() {
        anyhow::bail!(
            "Content root {} is not a directory",
            config.content_root.display()
        );
    }
    let store = FsContentStore::new(&config.content_root);
    log::debug!("Reading documents from {}", store.root().display());

    let source = File::open(&config.input_file)
        .with_context(|| format!("Failed to open input {}", config.input_file.display()))?;
    let destination = File::create(&config.output_file)
        .with_context(|| format!("Failed to create output {}", config.output_file.display()))?;

    let summary = compare_titles(
        BufReader::new(source),
        destination,
        &store,
        config.processing_cap(),
        pb,
    )
    .inspect_err(|e| {
        if let Some(line) = e.line() {
            log::error!("Run aborted at input record {}", fmt_num(line));
        }
    })?;
    pb.finish_and_clear();

    log::info!("=== Title Comparison Summary ===");
    log::info!(
        "Records: {} processed ({} written, {} skipped)",
        fmt_num(summary.processed),
        fmt_num(summary.written),
        fmt_num(summary.skipped)
    );
    log::info!("Title mismatches: {}", fmt_num(summary.mismatched));
    log::info!("Time: {:.1}s", summary.elapsed.as_secs_f64());

    if summary.processed > 0 {
        let rate = summary.processed as f64 / summary.elapsed.as_secs_f64();
        log::info!("Throughput: {:.0} records/sec", rate);
    }

    Ok(summary)
}
