//! Streaming reader for the input CSV
//!
//! The `csv` crate is lenient about quotes: an unterminated quoted field runs
//! to end of input and a stray `"` inside an unquoted field is kept as data.
//! Each row's raw bytes are therefore checked with [`check_quoting`] before
//! the parsed row is accepted.

use std::cell::RefCell;
use std::io::{self, Read};
use std::rc::Rc;

use crate::error::{AuditError, InputError, QuoteError};
use crate::record::InputRecord;

/// Bytes pulled from the source that have not yet been checked
type RawBuf = Rc<RefCell<Vec<u8>>>;

/// Passes reads through while keeping a copy of every byte read.
struct Tap<R> {
    inner: R,
    seen: RawBuf,
}

impl<R: Read> Read for Tap<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.seen.borrow_mut().extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

/// Check the quoting of one raw CSV row (terminator included).
///
/// A quoted field must close, and its closing quote must be followed by a
/// delimiter or line end. Unquoted fields may not contain `"`.
pub fn check_quoting(raw: &[u8]) -> Result<(), QuoteError> {
    let mut i = 0;
    let mut field_start = true;

    while i < raw.len() {
        if field_start && raw[i] == b'"' {
            i += 1;
            loop {
                match raw.get(i) {
                    None => return Err(QuoteError::Unterminated),
                    Some(b'"') if raw.get(i + 1) == Some(&b'"') => i += 2,
                    Some(b'"') => {
                        i += 1;
                        break;
                    }
                    Some(_) => i += 1,
                }
            }
            match raw.get(i) {
                None | Some(b',' | b'\n' | b'\r') => {}
                Some(_) => return Err(QuoteError::Extraneous),
            }
            field_start = false;
            continue;
        }
        match raw[i] {
            b',' | b'\n' | b'\r' => field_start = true,
            b'"' => return Err(QuoteError::BareQuote),
            _ => field_start = false,
        }
        i += 1;
    }
    Ok(())
}

/// Forward-only iterator over input records.
///
/// The header row is consumed on construction. Each call to `next` parses
/// exactly one row.
pub struct RecordReader<R> {
    inner: csv::Reader<Tap<R>>,
    raw: RawBuf,
    /// Source offset of `raw[0]`
    raw_offset: u64,
    row: csv::StringRecord,
    records_read: usize,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    /// Wrap `source` and consume its header row.
    pub fn new(source: R) -> Result<Self, AuditError> {
        let raw = RawBuf::default();
        let inner = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(Tap {
                inner: source,
                seen: Rc::clone(&raw),
            });

        let mut reader = Self {
            inner,
            raw,
            raw_offset: 0,
            row: csv::StringRecord::new(),
            records_read: 0,
            done: false,
        };
        reader.read_header().map_err(|source| AuditError::MalformedInput {
            record: None,
            source,
        })?;
        Ok(reader)
    }

    fn read_header(&mut self) -> Result<(), InputError> {
        let header = self.inner.headers()?;
        if header.is_empty() {
            return Err(InputError::MissingHeader);
        }
        log::debug!("Input header: {:?}", header);
        self.check_consumed()
    }

    /// Number of data records yielded so far
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Quote-check the raw bytes of the row just parsed, then release them.
    fn check_consumed(&mut self) -> Result<(), InputError> {
        let end = self.inner.position().byte();
        let mut raw = self.raw.borrow_mut();
        let len = usize::try_from(end - self.raw_offset)
            .map_or(raw.len(), |len| len.min(raw.len()));
        check_quoting(&raw[..len])?;
        raw.drain(..len);
        self.raw_offset = end;
        Ok(())
    }

    fn read_next(&mut self) -> Result<Option<InputRecord>, InputError> {
        if !self.inner.read_record(&mut self.row)? {
            return Ok(None);
        }
        self.check_consumed()?;
        if self.row.len() != 3 {
            return Err(InputError::FieldCount {
                found: self.row.len(),
            });
        }
        Ok(Some(InputRecord {
            identifier: self.row[0].to_string(),
            stored_title: self.row[1].to_string(),
            created_at: self.row[2].to_string(),
        }))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<InputRecord, AuditError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_next() {
            Ok(Some(record)) => {
                self.records_read += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(source) => {
                // A parse error leaves the reader mid-row; stop here.
                self.done = true;
                Some(Err(AuditError::MalformedInput {
                    record: Some(self.records_read + 1),
                    source,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &str) -> Vec<Result<InputRecord, AuditError>> {
        RecordReader::new(input.as_bytes()).unwrap().collect()
    }

    #[test]
    fn header_is_skipped() {
        let records = read_all("id,title,createdAt\nA1,Old Title,2024-01-01\n");
        assert_eq!(records.len(), 1);
        let record = records[0].as_ref().unwrap();
        assert_eq!(record.identifier, "A1");
        assert_eq!(record.stored_title, "Old Title");
        assert_eq!(record.created_at, "2024-01-01");
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(read_all("id,title,createdAt\n").is_empty());
    }

    #[test]
    fn empty_input_is_malformed() {
        let err = RecordReader::new("".as_bytes()).err().unwrap();
        assert!(matches!(err, AuditError::MalformedInput { record: None, .. }));
    }

    #[test]
    fn quoted_fields_are_unescaped() {
        let input =
            "id,title,createdAt\n\"B2\",\"Title, with \"\"quotes\"\"\nand a newline\",2024-02-02\n";
        let records = read_all(input);
        let record = records[0].as_ref().unwrap();
        assert_eq!(record.identifier, "B2");
        assert_eq!(
            record.stored_title,
            "Title, with \"quotes\"\nand a newline"
        );
    }

    #[test]
    fn rows_come_in_file_order() {
        let input = "id,title,createdAt\nA,1,x\nB,2,y\nC,3,z\n";
        let ids: Vec<String> = read_all(input)
            .into_iter()
            .map(|r| r.unwrap().identifier)
            .collect();
        assert_eq!(ids, ["A", "B", "C"]);
    }

    #[test]
    fn short_row_is_malformed_at_its_line() {
        let input = "id,title,createdAt\nA,1,x\nB,2\nC,3,z\n";
        let records = read_all(input);
        // Iteration stops at the first error
        assert_eq!(records.len(), 2);
        assert!(records[0].is_ok());
        let err = records[1].as_ref().err().unwrap();
        assert!(matches!(err, AuditError::MalformedInput { record: Some(2), .. }));
    }

    #[test]
    fn two_column_file_is_malformed() {
        let records = read_all("id,title\nA,1\n");
        let err = records[0].as_ref().err().unwrap();
        assert!(matches!(
            err,
            AuditError::MalformedInput {
                record: Some(1),
                source: InputError::FieldCount { found: 2 }
            }
        ));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let mut input = b"id,title,createdAt\nA,".to_vec();
        input.extend_from_slice(&[0xff, 0xfe]);
        input.extend_from_slice(b",x\n");
        let mut reader = RecordReader::new(input.as_slice()).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(AuditError::MalformedInput { record: Some(1), .. }))
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn unterminated_quote_at_end_is_malformed() {
        let records = read_all("id,title,createdAt\nA1,x,d\nA2,y,\"2024-01-01\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap().identifier, "A1");
        assert!(matches!(
            records[1],
            Err(AuditError::MalformedInput {
                record: Some(2),
                source: InputError::Quoting(QuoteError::Unterminated)
            })
        ));
    }

    #[test]
    fn bare_quote_in_unquoted_field_is_malformed() {
        let records = read_all("id,title,createdAt\nA1,Ti\"tle,d\n");
        assert!(matches!(
            records[..],
            [Err(AuditError::MalformedInput {
                record: Some(1),
                source: InputError::Quoting(QuoteError::BareQuote)
            })]
        ));
    }

    #[test]
    fn text_after_closing_quote_is_malformed() {
        let records = read_all("id,title,createdAt\nA1,\"Ti\"tle,d\n");
        assert!(matches!(
            records[0],
            Err(AuditError::MalformedInput {
                source: InputError::Quoting(QuoteError::Extraneous),
                ..
            })
        ));
    }

    #[test]
    fn bad_quoting_in_header_is_malformed() {
        let err = RecordReader::new("id,ti\"tle,createdAt\nA,1,x\n".as_bytes())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            AuditError::MalformedInput {
                record: None,
                source: InputError::Quoting(QuoteError::BareQuote)
            }
        ));
    }

    #[test]
    fn crlf_rows_pass_quote_check() {
        let records = read_all("id,title,createdAt\r\n\"A\",\"x, y\",1\r\nB,z,2\r\n");
        let ids: Vec<String> = records.into_iter().map(|r| r.unwrap().identifier).collect();
        assert_eq!(ids, ["A", "B"]);
    }

    #[test]
    fn quoting_rules() {
        assert_eq!(check_quoting(b"a,b,c\n"), Ok(()));
        assert_eq!(check_quoting(b"\"a\",\"\",\"say \"\"hi\"\"\"\n"), Ok(()));
        assert_eq!(check_quoting(b"\"multi\nline\",b,c\r\n"), Ok(()));
        assert_eq!(check_quoting(b"a,b,\"c"), Err(QuoteError::Unterminated));
        assert_eq!(check_quoting(b"a,b\"c,d\n"), Err(QuoteError::BareQuote));
        assert_eq!(check_quoting(b"\"a\"b,c,d\n"), Err(QuoteError::Extraneous));
        assert_eq!(check_quoting(b"a,\"\"\"\n"), Err(QuoteError::Unterminated));
    }

    #[test]
    fn counts_records_read() {
        let mut reader = RecordReader::new("h1,h2,h3\na,b,c\nd,e,f\n".as_bytes()).unwrap();
        reader.next();
        assert_eq!(reader.records_read(), 1);
        reader.next();
        reader.next();
        assert_eq!(reader.records_read(), 2);
    }
}
