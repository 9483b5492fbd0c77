//! Title extraction from cleaned XML documents using quick-xml
//!
//! Documents look like:
//!
//! ```xml
//! <doc title="Article title" ...>
//!   <main><p>body markup</p></main>
//! </doc>
//! ```
//!
//! Only the root's `title` attribute is kept. The body is walked to check it
//! is well-formed and then dropped.

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::DocumentError;

/// Name of the root attribute holding the declared title
const TITLE_ATTR: &[u8] = b"title";

/// What the pipeline needs from a parsed document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Root `title` attribute, unescaped. Empty when the attribute is empty or absent.
    pub title: String,
}

/// Parse a document and return its declared title.
///
/// The first element in the document is the root, whatever its name.
/// Extraction stops once the root closes, so trailing content is not read.
pub fn extract_title(xml: &[u8]) -> Result<ParsedDocument, DocumentError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let title = read_title(&e)?;
                validate_subtree(&mut reader)?;
                return Ok(ParsedDocument { title });
            }
            Event::Empty(e) => {
                return Ok(ParsedDocument {
                    title: read_title(&e)?,
                });
            }
            Event::Eof => return Err(DocumentError::NoRootElement),
            // Declaration, comments, doctype, processing instructions
            _ => {}
        }
        buf.clear();
    }
}

/// Value of the `title` attribute. A later `title` (e.g. prefixed) overrides an earlier one.
fn read_title(root: &BytesStart<'_>) -> Result<String, DocumentError> {
    let mut title = String::new();
    for attr in root.attributes() {
        let attr = attr?;
        let value = attribute_value(&attr)?;
        if attr.key.local_name().as_ref() == TITLE_ATTR {
            title = value.into_owned();
        }
    }
    Ok(title)
}

/// Walk the rest of the root element, failing on anything not well-formed.
fn validate_subtree(reader: &mut Reader<&[u8]>) -> Result<(), DocumentError> {
    let mut buf = Vec::new();
    let mut depth = 1usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                check_attributes(&e)?;
                depth += 1;
            }
            Event::Empty(e) => check_attributes(&e)?,
            Event::End(_) => {
                // Mismatched names are rejected by the reader itself
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Text(e) => {
                e.unescape()?;
            }
            Event::Eof => return Err(DocumentError::UnexpectedEof { open: depth }),
            _ => {}
        }
        buf.clear();
    }
}

fn check_attributes(element: &BytesStart<'_>) -> Result<(), DocumentError> {
    for attr in element.attributes() {
        attribute_value(&attr?)?;
    }
    Ok(())
}

/// Unescaped attribute value. A literal `<` is not allowed in attribute values.
fn attribute_value<'a>(attr: &Attribute<'a>) -> Result<Cow<'a, str>, DocumentError> {
    if attr.value.contains(&b'<') {
        return Err(DocumentError::LessThanInAttribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
        });
    }
    Ok(attr.unescape_value()?)
}
