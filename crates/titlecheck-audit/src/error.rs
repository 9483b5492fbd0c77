//! Error types for the audit pipeline
//!
//! Each component has its own error enum; [`AuditError`] is what the
//! orchestrator surfaces when a run has to stop. Missing content is the only
//! condition that never becomes an `AuditError`.

use std::fmt;
use std::io;

/// Quoting rule broken by a raw CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteError {
    /// Quoted field still open at end of input
    Unterminated,
    /// `"` inside an unquoted field
    BareQuote,
    /// Closing quote followed by something other than a delimiter or line end
    Extraneous,
}

impl fmt::Display for QuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unterminated => write!(f, "unterminated quoted field"),
            Self::BareQuote => write!(f, "bare \" in non-quoted field"),
            Self::Extraneous => write!(f, "extraneous or missing \" in quoted field"),
        }
    }
}

impl std::error::Error for QuoteError {}

/// Failure to read the input CSV.
#[derive(Debug)]
pub enum InputError {
    /// Parse error from the CSV reader (unequal field counts, bad UTF-8)
    Csv(csv::Error),
    /// Data row parsed but did not have the three expected fields
    FieldCount { found: usize },
    Quoting(QuoteError),
    /// Input had no header row at all
    MissingHeader,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(e) => write!(f, "{e}"),
            Self::FieldCount { found } => write!(f, "expected 3 fields, found {found}"),
            Self::Quoting(e) => write!(f, "{e}"),
            Self::MissingHeader => write!(f, "missing header row"),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv(e) => Some(e),
            Self::Quoting(e) => Some(e),
            _ => None,
        }
    }
}

impl From<QuoteError> for InputError {
    fn from(e: QuoteError) -> Self {
        Self::Quoting(e)
    }
}

impl From<csv::Error> for InputError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

/// Failure to resolve a content key.
#[derive(Debug)]
pub enum LookupError {
    /// No document stored under the key. Recoverable: the record is skipped.
    NotFound { key: String },
    /// Any other I/O failure (permissions, disk errors, key is a directory)
    Unavailable { key: String, source: io::Error },
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn key(&self) -> &str {
        match self {
            Self::NotFound { key } | Self::Unavailable { key, .. } => key,
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { key } => write!(f, "content not found: {key}"),
            Self::Unavailable { key, source } => {
                write!(f, "content store unavailable reading {key}: {source}")
            }
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Unavailable { source, .. } => Some(source),
        }
    }
}

/// Failure to extract a title from a content blob.
#[derive(Debug)]
pub enum DocumentError {
    /// Markup is not well-formed (syntax, mismatched tags, bad escapes, bad attributes)
    Xml(quick_xml::Error),
    /// Attribute value contains a literal `<`
    LessThanInAttribute { name: String },
    /// Document ended before any element was opened
    NoRootElement,
    /// Document ended with `open` elements still unclosed
    UnexpectedEof { open: usize },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml(e) => write!(f, "XML error: {e}"),
            Self::LessThanInAttribute { name } => {
                write!(f, "attribute {name:?} contains a literal '<'")
            }
            Self::NoRootElement => write!(f, "document has no root element"),
            Self::UnexpectedEof { open } => {
                write!(f, "unexpected end of document ({open} unclosed elements)")
            }
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for DocumentError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

impl From<quick_xml::events::attributes::AttrError> for DocumentError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(quick_xml::Error::InvalidAttr(e))
    }
}

/// Fatal error that aborts an audit run.
///
/// `line` is the 1-based position of the data record being processed
/// (the header row is not counted).
#[derive(Debug)]
pub enum AuditError {
    /// Input CSV could not be parsed. `record` is `None` for header failures.
    MalformedInput {
        record: Option<usize>,
        source: InputError,
    },
    StoreUnavailable {
        line: usize,
        identifier: String,
        source: LookupError,
    },
    MalformedDocument {
        line: usize,
        identifier: String,
        source: DocumentError,
    },
    /// Result CSV could not be written. `line` is `None` for header/flush failures.
    Output {
        line: Option<usize>,
        source: csv::Error,
    },
}

impl AuditError {
    /// Record line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedInput { record, .. } => *record,
            Self::StoreUnavailable { line, .. } | Self::MalformedDocument { line, .. } => {
                Some(*line)
            }
            Self::Output { line, .. } => *line,
        }
    }
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput {
                record: Some(n),
                source,
            } => write!(f, "unable to parse input as CSV at line {n}: {source}"),
            Self::MalformedInput {
                record: None,
                source,
            } => write!(f, "unable to parse input as CSV: {source}"),
            Self::StoreUnavailable {
                line,
                identifier,
                source,
            } => write!(f, "unable to process line {line} ({identifier}): {source}"),
            Self::MalformedDocument {
                line,
                identifier,
                source,
            } => write!(
                f,
                "unable to process line {line} ({identifier}): malformed document: {source}"
            ),
            Self::Output {
                line: Some(n),
                source,
            } => write!(f, "result output error at line {n}: {source}"),
            Self::Output { line: None, source } => write!(f, "result output error: {source}"),
        }
    }
}

impl std::error::Error for AuditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedInput { source, .. } => Some(source),
            Self::StoreUnavailable { source, .. } => Some(source),
            Self::MalformedDocument { source, .. } => Some(source),
            Self::Output { source, .. } => Some(source),
        }
    }
}
