//! Import/export glue between category documents and the record store.
//!
//! Failures never propagate past this boundary as panics: the `try_` functions
//! return a [`TransferError`], and the plain variants fold it into a
//! [`TransferOutcome`] carrying a success flag and a human-readable message.

use crate::document::{records_from_document, write_document};
use crate::error::TransferError;
use crate::parse::{ParseMode, parse_document};
use crate::{CategoryKind, RecordStore, statics};
use anyhow::Context;
use flate2::{Compression, GzBuilder, read::GzDecoder};
use std::{
    collections::HashMap,
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};

/// Where category documents live. Resolving a category to a location is the
/// implementor's business; the core only reads and writes whole documents.
pub trait DocumentStore {
    /// Raw document bytes, or `None` when the category has no document yet.
    fn read_bytes(&self, category: CategoryKind) -> anyhow::Result<Option<Vec<u8>>>;

    fn write_bytes(&mut self, category: CategoryKind, bytes: &[u8]) -> anyhow::Result<()>;

    /// Human-readable location used in status messages.
    fn location(&self, category: CategoryKind) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Plain,
    Gzip,
}

/// One document file per category in a directory: `<root>/<Category>.json`
/// (or `.json.gz`). Gzip input is detected by magic bytes regardless of format.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    format: DocumentFormat,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            format: DocumentFormat::Plain,
        }
    }

    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn path_for(&self, category: CategoryKind) -> PathBuf {
        let ext = match self.format {
            DocumentFormat::Plain => statics::DOC_EXT_PLAIN,
            DocumentFormat::Gzip => statics::DOC_EXT_GZIP,
        };
        self.root.join(format!("{}.{ext}", category.name()))
    }
}

impl DocumentStore for DirectoryStore {
    fn read_bytes(&self, category: CategoryKind) -> anyhow::Result<Option<Vec<u8>>> {
        let path = self.path_for(category);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).with_context(|| format!("reading {path:?}"))?;
        if !bytes.starts_with(&statics::GZIP_MAGIC) {
            return Ok(Some(bytes));
        }

        let mut decoder = GzDecoder::new(&bytes[..]);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .with_context(|| format!("gzip decompress {path:?}"))?;
        Ok(Some(out))
    }

    fn write_bytes(&mut self, category: CategoryKind, bytes: &[u8]) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root).with_context(|| format!("creating {:?}", self.root))?;
        let path = self.path_for(category);

        let encoded = match self.format {
            DocumentFormat::Plain => bytes.to_vec(),
            DocumentFormat::Gzip => {
                let mut encoder = GzBuilder::new()
                    .mtime(0)
                    .write(Vec::new(), Compression::default());
                encoder.write_all(bytes).context("gzip compress")?;
                encoder.finish().context("gzip finish")?
            }
        };
        fs::write(&path, &encoded).with_context(|| format!("writing {path:?}"))?;
        Ok(())
    }

    fn location(&self, category: CategoryKind) -> String {
        self.path_for(category).display().to_string()
    }
}

/// Documents kept in memory, keyed by category.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<CategoryKind, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: CategoryKind, text: impl Into<String>) {
        self.documents.insert(category, text.into().into_bytes());
    }

    pub fn get(&self, category: CategoryKind) -> Option<&[u8]> {
        self.documents.get(&category).map(Vec::as_slice)
    }
}

impl DocumentStore for MemoryStore {
    fn read_bytes(&self, category: CategoryKind) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.documents.get(&category).cloned())
    }

    fn write_bytes(&mut self, category: CategoryKind, bytes: &[u8]) -> anyhow::Result<()> {
        self.documents.insert(category, bytes.to_vec());
        Ok(())
    }

    fn location(&self, category: CategoryKind) -> String {
        format!("memory:{category}")
    }
}

/// Result of one import or export, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub category: CategoryKind,
    pub success: bool,
    pub message: String,
    pub records: usize,
}

/// Replace `category`'s records with the ones typed from its document.
/// The store is only touched once the whole document has been read and parsed.
pub fn try_import_category(
    store: &mut RecordStore,
    category: CategoryKind,
    source: &dyn DocumentStore,
    mode: ParseMode,
) -> Result<usize, TransferError> {
    let bytes = source
        .read_bytes(category)
        .map_err(|error| TransferError::Io { category, error })?
        .ok_or_else(|| TransferError::NotFound {
            category,
            location: source.location(category),
        })?;
    let text = String::from_utf8(bytes).map_err(|_| TransferError::NotUtf8 { category })?;
    let doc = parse_document(&text, mode).map_err(|e| TransferError::Parse {
        category,
        source: e,
    })?;

    let records = records_from_document(category, &doc);
    let count = records.len();
    store.category_mut(category).replace_nodes(records);
    Ok(count)
}

pub fn import_category(
    store: &mut RecordStore,
    category: CategoryKind,
    source: &dyn DocumentStore,
    mode: ParseMode,
) -> TransferOutcome {
    match try_import_category(store, category, source, mode) {
        Ok(records) => {
            tracing::info!(%category, records, "imported category document");
            TransferOutcome {
                category,
                success: true,
                message: format!(
                    "{} {records} {category} records from {}",
                    statics::EN_IMPORTED,
                    source.location(category)
                ),
                records,
            }
        }
        Err(e) => {
            tracing::warn!(%category, error = %e, "import failed");
            TransferOutcome {
                category,
                success: false,
                message: format!("{}: {e}", statics::EN_IMPORT_FAILED),
                records: 0,
            }
        }
    }
}

/// Write `category`'s records as a UTF-8 document (no byte-order mark).
pub fn try_export_category(
    store: &RecordStore,
    category: CategoryKind,
    sink: &mut dyn DocumentStore,
) -> Result<usize, TransferError> {
    let records = store.category(category).all_nodes();
    let text = write_document(records);
    sink.write_bytes(category, text.as_bytes())
        .map_err(|error| TransferError::Io { category, error })?;
    Ok(records.len())
}

pub fn export_category(
    store: &RecordStore,
    category: CategoryKind,
    sink: &mut dyn DocumentStore,
) -> TransferOutcome {
    match try_export_category(store, category, sink) {
        Ok(records) => {
            tracing::info!(%category, records, "exported category document");
            TransferOutcome {
                category,
                success: true,
                message: format!(
                    "{} {records} {category} records to {}",
                    statics::EN_EXPORTED,
                    sink.location(category)
                ),
                records,
            }
        }
        Err(e) => {
            tracing::warn!(%category, error = %e, "export failed");
            TransferOutcome {
                category,
                success: false,
                message: format!("{}: {e}", statics::EN_EXPORT_FAILED),
                records: 0,
            }
        }
    }
}

pub fn import_all(
    store: &mut RecordStore,
    source: &dyn DocumentStore,
    mode: ParseMode,
) -> Vec<TransferOutcome> {
    CategoryKind::ALL
        .into_iter()
        .map(|category| import_category(store, category, source, mode))
        .collect()
}

pub fn export_all(store: &RecordStore, sink: &mut dyn DocumentStore) -> Vec<TransferOutcome> {
    CategoryKind::ALL
        .into_iter()
        .map(|category| export_category(store, category, sink))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{MemoryStore, import_category, try_import_category};
    use crate::error::TransferError;
    use crate::parse::ParseMode;
    use crate::{CategoryKind, RecordStore, SchemaCatalog};

    #[test]
    fn missing_document_reports_not_found_and_keeps_records() {
        let schemas = SchemaCatalog::builtin();
        let mut store = RecordStore::new();
        store
            .category_mut(CategoryKind::Skill)
            .ensure_seeded(schemas.schemas_for(CategoryKind::Skill));

        let source = MemoryStore::new();
        let err = try_import_category(&mut store, CategoryKind::Skill, &source, ParseMode::Lenient)
            .unwrap_err();
        assert!(matches!(err, TransferError::NotFound { .. }));

        let outcome = import_category(&mut store, CategoryKind::Skill, &source, ParseMode::Lenient);
        assert!(!outcome.success);
        assert!(outcome.message.contains("memory:Skill"), "{}", outcome.message);
        assert_eq!(store.category(CategoryKind::Skill).len(), 1);
    }

    #[test]
    fn strict_parse_failure_leaves_store_untouched() {
        let mut store = RecordStore::new();
        let mut source = MemoryStore::new();
        source.insert(CategoryKind::Effect, r#"{"1": {"A": 1}}"#);
        assert_eq!(
            try_import_category(&mut store, CategoryKind::Effect, &source, ParseMode::Strict).unwrap(),
            1
        );

        source.insert(CategoryKind::Effect, r#"{"2": {"A": 1 "B": 2}}"#);
        let outcome = import_category(&mut store, CategoryKind::Effect, &source, ParseMode::Strict);
        assert!(!outcome.success);
        assert_eq!(store.category(CategoryKind::Effect).all_nodes()[0].id, 1);
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let mut store = RecordStore::new();
        let mut source = MemoryStore::new();
        super::DocumentStore::write_bytes(&mut source, CategoryKind::Condition, &[0xFF, 0xFE])
            .unwrap();
        let err = try_import_category(&mut store, CategoryKind::Condition, &source, ParseMode::Lenient)
            .unwrap_err();
        assert!(matches!(err, TransferError::NotUtf8 { .. }));
    }
}
