//! Extract subcommand - show the document title for one identifier

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use titlecheck_audit::{ContentStore, FsContentStore, LookupError, content_key, extract_title};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Record identifier (document key is <identifier>.xml)
    pub identifier: String,

    /// Directory containing <identifier>.xml documents
    #[arg(long)]
    pub content_root: Option<PathBuf>,
}

pub fn run(args: ExtractArgs, config: &Config) -> Result<()> {
    let root = args.content_root.unwrap_or_else(|| config.store.root.clone());
    let store = FsContentStore::new(root);

    let blob = match store.lookup(&args.identifier) {
        Ok(blob) => blob,
        Err(LookupError::NotFound { key }) => {
            println!(
                "{}: not found ({})",
                args.identifier,
                store.path_for(&key).display()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let doc = extract_title(blob.as_bytes()).with_context(|| {
        format!(
            "Failed to parse {}",
            store.path_for(&content_key(&args.identifier)).display()
        )
    })?;

    println!("{}\t{}", args.identifier, doc.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(id: &str, root: &std::path::Path) -> ExtractArgs {
        ExtractArgs {
            identifier: id.to_string(),
            content_root: Some(root.to_path_buf()),
        }
    }

    #[test]
    fn missing_document_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        run(args("A1", dir.path()), &Config::default()).unwrap();
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("A1.xml"), "<doc title=\"x\">").unwrap();
        let err = run(args("A1", dir.path()), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("A1.xml"));
    }

    #[test]
    fn valid_document_succeeds() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("A1.xml"), "<doc title=\"x\"/>").unwrap();
        run(args("A1", dir.path()), &Config::default()).unwrap();
    }
}
