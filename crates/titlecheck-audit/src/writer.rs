//! Result CSV writer

use std::io::Write;

use crate::error::AuditError;
use crate::record::{OUTPUT_HEADER, OutputRow};

/// Streaming CSV writer for output rows.
///
/// Rows are appended in call order. The underlying writer is flushed exactly
/// once: by [`ResultWriter::finish`], or on drop if the run aborted first.
pub struct ResultWriter<W: Write> {
    inner: Option<csv::Writer<W>>,
    rows_written: usize,
}

impl<W: Write> std::fmt::Debug for ResultWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultWriter")
            .field("rows_written", &self.rows_written)
            .finish_non_exhaustive()
    }
}

impl<W: Write> ResultWriter<W> {
    pub fn new(destination: W) -> Self {
        let inner = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(destination);
        Self {
            inner: Some(inner),
            rows_written: 0,
        }
    }

    fn csv(&mut self) -> &mut csv::Writer<W> {
        self.inner
            .as_mut()
            .expect("ResultWriter used after finish")
    }

    /// Write the `identifier,storedTitle,extractedTitle` header
    pub fn write_header(&mut self) -> Result<(), AuditError> {
        self.csv()
            .write_record(OUTPUT_HEADER)
            .map_err(|source| AuditError::Output { line: None, source })
    }

    /// Append one row. `line` is only used to annotate errors.
    pub fn write_row(&mut self, line: usize, row: &OutputRow) -> Result<(), AuditError> {
        self.csv()
            .write_record(row.fields())
            .map_err(|source| AuditError::Output {
                line: Some(line),
                source,
            })?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush everything and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, AuditError> {
        let inner = self
            .inner
            .take()
            .expect("ResultWriter finished twice");
        inner.into_inner().map_err(|e| AuditError::Output {
            line: None,
            source: csv::Error::from(e.into_error()),
        })
    }
}

impl<W: Write> Drop for ResultWriter<W> {
    fn drop(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            if let Err(e) = inner.flush() {
                log::warn!("Failed to flush results after {} rows: {e}", self.rows_written);
            }
        }
    }
}
