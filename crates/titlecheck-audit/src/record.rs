//! Input and output row types

/// Output header, in column order
pub const OUTPUT_HEADER: [&str; 3] = ["identifier", "storedTitle", "extractedTitle"];

/// One data row of the input CSV: `identifier,storedTitle,createdAt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub identifier: String,
    pub stored_title: String,
    /// Carried through as-is; never interpreted.
    pub created_at: String,
}

/// One data row of the result CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub identifier: String,
    pub stored_title: String,
    pub extracted_title: String,
}

impl OutputRow {
    /// Pair an input record with the title extracted from its document.
    pub fn new(record: InputRecord, extracted_title: String) -> Self {
        Self {
            identifier: record.identifier,
            stored_title: record.stored_title,
            extracted_title,
        }
    }

    pub fn fields(&self) -> [&str; 3] {
        [&self.identifier, &self.stored_title, &self.extracted_title]
    }

    /// Whether the stored title differs from the document's title
    pub fn is_mismatch(&self) -> bool {
        self.stored_title != self.extracted_title
    }
}
