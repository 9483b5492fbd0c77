//! Content store lookup: identifier → cleaned XML document

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::LookupError;

/// Raw document bytes, held only while one record is processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlob(Vec<u8>);

impl ContentBlob {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Key a document is stored under
pub fn content_key(identifier: &str) -> String {
    format!("{identifier}.xml")
}

/// Resolves record identifiers to stored documents.
pub trait ContentStore {
    /// Fetch the document for `identifier`.
    ///
    /// Returns [`LookupError::NotFound`] when nothing is stored under
    /// [`content_key`]`(identifier)`, and [`LookupError::Unavailable`] for any
    /// other failure.
    fn lookup(&self, identifier: &str) -> Result<ContentBlob, LookupError>;
}

/// Content store backed by a flat directory of `<identifier>.xml` files
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path a key resolves to
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ContentStore for FsContentStore {
    fn lookup(&self, identifier: &str) -> Result<ContentBlob, LookupError> {
        let key = content_key(identifier);
        let path = self.path_for(&key);
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::trace!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(ContentBlob(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(LookupError::NotFound { key }),
            Err(source) => Err(LookupError::Unavailable { key, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn key_appends_xml_extension() {
        assert_eq!(content_key("A1"), "A1.xml");
        assert_eq!(content_key(""), ".xml");
    }

    #[test]
    fn lookup_existing_document() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("A1.xml"), b"<doc title=\"x\"/>").unwrap();

        let store = FsContentStore::new(dir.path());
        let blob = store.lookup("A1").unwrap();
        assert_eq!(blob.as_bytes(), b"<doc title=\"x\"/>");
        assert_eq!(blob.len(), 16);
    }

    #[test]
    fn lookup_missing_document_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FsContentStore::new(dir.path());

        let err = store.lookup("missing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.key(), "missing.xml");
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FsContentStore::new(dir.path().join("does-not-exist"));
        assert!(store.lookup("A1").unwrap_err().is_not_found());
    }

    #[test]
    fn directory_at_key_is_unavailable() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("A1.xml")).unwrap();

        let store = FsContentStore::new(dir.path());
        let err = store.lookup("A1").unwrap_err();
        assert!(matches!(err, LookupError::Unavailable { .. }));
    }

    #[test]
    fn empty_file_is_found() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("E.xml"), b"").unwrap();

        let store = FsContentStore::new(dir.path());
        assert!(store.lookup("E").unwrap().is_empty());
    }
}
