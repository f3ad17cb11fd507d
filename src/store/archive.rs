use serde_json::Value;
use thiserror::Error;

use crate::document::{Document, RawDocument, RawError, blocks_from_raw, convert_to_raw};
use crate::editor::EditorState;

use super::storage::Storage;

/// Storage key the archive lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "editorContent";

/// Why a stored archive could not be used.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("archive is not a JSON array")]
    NotAnArray,
    #[error("archive entry {index} is not a raw document: {source}")]
    Entry {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("archive entry {index} is invalid: {source}")]
    Document {
        index: usize,
        #[source]
        source: RawError,
    },
}

/// Outcome of [`DocumentStore::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    /// Documents in the in-memory archive after the save.
    pub archived: usize,
    /// Whether the archive reached storage. When `false` the in-memory
    /// archive is ahead of what is persisted.
    pub persisted: bool,
}

/// Persists documents as an ordered archive under a single storage key.
///
/// Unreadable or wrongly shaped archives are treated as empty and logged;
/// no operation here fails.
pub struct DocumentStore {
    storage: Box<dyn Storage>,
    key: String,
    archive: Vec<Value>,
}

impl DocumentStore {
    /// Open the archive at `key`, priming the in-memory copy from storage.
    pub fn open(storage: Box<dyn Storage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let archive = read_blob(storage.as_ref(), &key)
            .map(|blob| lenient_entries(&key, &blob))
            .unwrap_or_default();
        Self {
            storage,
            key,
            archive,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of documents in the in-memory archive.
    pub const fn archive_len(&self) -> usize {
        self.archive.len()
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Append the editor's document to the archive, persist it, and clear
    /// the editor.
    ///
    /// Entries already in storage are kept as-is, without validation. A
    /// failed write is logged and reported through [`SaveReport::persisted`];
    /// the editor is cleared either way.
    pub fn save(&mut self, editor: &mut EditorState) -> SaveReport {
        let entry = match serde_json::to_value(convert_to_raw(editor.document())) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::error!(%err, "failed to serialize document");
                return SaveReport {
                    archived: self.archive.len(),
                    persisted: false,
                };
            }
        };

        let mut archive = read_blob(self.storage.as_ref(), &self.key)
            .map(|blob| lenient_entries(&self.key, &blob))
            .unwrap_or_default();
        archive.push(entry);

        let persisted = match serde_json::to_string(&archive) {
            Ok(blob) => match self.storage.set(&self.key, &blob) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(key = %self.key, %err, "failed to persist archive");
                    false
                }
            },
            Err(err) => {
                tracing::warn!(key = %self.key, %err, "failed to encode archive");
                false
            }
        };

        self.archive = archive;
        editor.reset();
        tracing::info!(
            key = %self.key,
            archived = self.archive.len(),
            persisted,
            "saved document"
        );
        SaveReport {
            archived: self.archive.len(),
            persisted,
        }
    }

    /// Every archived document merged into one, blocks in archive order.
    ///
    /// A missing, unreadable or invalid archive yields the empty document;
    /// storage is left untouched.
    pub fn load_all(&self) -> Document {
        let Some(blob) = read_blob(self.storage.as_ref(), &self.key) else {
            return Document::empty();
        };
        match decode_archive(&blob) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(key = %self.key, %err, "failed to load saved content");
                Document::empty()
            }
        }
    }

    /// Remove the archive from storage and clear the editor.
    pub fn delete_all(&mut self, editor: &mut EditorState) {
        if let Err(err) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, %err, "failed to remove archive");
        }
        self.archive.clear();
        editor.reset();
        tracing::info!(key = %self.key, "deleted all saved content");
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("key", &self.key)
            .field("archived", &self.archive.len())
            .finish_non_exhaustive()
    }
}

/// Read the stored blob; read failures count as absent.
fn read_blob(storage: &dyn Storage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(blob) => blob,
        Err(err) => {
            tracing::warn!(key, %err, "failed to read archive");
            None
        }
    }
}

/// Parse the blob as a JSON array, keeping entries opaque.
///
/// # Errors
///
/// Returns [`ArchiveError`] for invalid JSON or a non-array value.
pub fn parse_entries(blob: &str) -> Result<Vec<Value>, ArchiveError> {
    match serde_json::from_str::<Value>(blob)? {
        Value::Array(entries) => Ok(entries),
        _ => Err(ArchiveError::NotAnArray),
    }
}

fn lenient_entries(key: &str, blob: &str) -> Vec<Value> {
    parse_entries(blob).unwrap_or_else(|err| {
        tracing::warn!(key, %err, "treating unreadable archive as empty");
        Vec::new()
    })
}

/// Decode every entry and concatenate their blocks in archive order.
///
/// # Errors
///
/// Returns [`ArchiveError`] if the blob or any entry is invalid.
pub fn decode_archive(blob: &str) -> Result<Document, ArchiveError> {
    let mut blocks = Vec::new();
    for (index, entry) in parse_entries(blob)?.into_iter().enumerate() {
        let raw: RawDocument = serde_json::from_value(entry)
            .map_err(|source| ArchiveError::Entry { index, source })?;
        blocks.extend(
            blocks_from_raw(&raw).map_err(|source| ArchiveError::Document { index, source })?,
        );
    }
    Ok(Document::from_blocks(blocks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, BlockType, InlineStyle};
    use crate::store::{FileStorage, MemoryStorage};
    use tempfile::tempdir;

    const KEY: &str = DEFAULT_STORAGE_KEY;

    fn store_with(storage: MemoryStorage) -> DocumentStore {
        DocumentStore::open(Box::new(storage), KEY)
    }

    fn editor_with(blocks: Vec<Block>) -> EditorState {
        EditorState::with_document(Document::from_blocks(blocks))
    }

    #[test]
    fn test_save_empty_then_load_yields_one_empty_document() {
        let mut store = store_with(MemoryStorage::new());
        let mut editor = EditorState::new();
        let report = store.save(&mut editor);
        assert_eq!(
            report,
            SaveReport {
                archived: 1,
                persisted: true
            }
        );
        assert_eq!(store.load_all(), Document::empty());
    }

    #[test]
    fn test_load_concatenates_in_archive_order() {
        let a = vec![
            Block::new(BlockType::HeaderOne, "A title"),
            Block::new(BlockType::Unstyled, "A body").with_style(2..6, InlineStyle::Bold),
        ];
        let b = vec![Block::new(BlockType::Unstyled, "B body").with_style(0..1, InlineStyle::Red)];

        let mut store = store_with(MemoryStorage::new());
        store.save(&mut editor_with(a.clone()));
        store.save(&mut editor_with(b.clone()));

        let merged = store.load_all();
        let expected: Vec<Block> = a.into_iter().chain(b).collect();
        assert_eq!(merged.blocks(), expected.as_slice());
    }

    #[test]
    fn test_save_resets_editor() {
        let mut store = store_with(MemoryStorage::new());
        let mut editor = EditorState::new();
        editor.insert_text("first\nsecond");
        store.save(&mut editor);
        assert!(!editor.document().has_text());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_non_array_archive_loads_empty() {
        let store = store_with(MemoryStorage::new().with_entry(KEY, r#""not an array""#));
        assert_eq!(store.load_all(), Document::empty());
        assert_eq!(store.archive_len(), 0);
    }

    #[test]
    fn test_invalid_json_loads_empty_without_erasing() {
        let store = store_with(MemoryStorage::new().with_entry(KEY, "{oops"));
        assert_eq!(store.load_all(), Document::empty());
        assert_eq!(store.storage().get(KEY).unwrap().as_deref(), Some("{oops"));
    }

    #[test]
    fn test_invalid_entry_loads_empty() {
        let blob = r#"[{"blocks":[{"text":"ok"}]},{"blocks":[{"text":"x","type":"nope"}]}]"#;
        let store = store_with(MemoryStorage::new().with_entry(KEY, blob));
        assert_eq!(store.load_all(), Document::empty());
        assert!(matches!(
            decode_archive(blob),
            Err(ArchiveError::Document { index: 1, .. })
        ));
    }

    #[test]
    fn test_save_over_non_array_resets_archive() {
        let mut store = store_with(MemoryStorage::new().with_entry(KEY, "42"));
        let mut editor = editor_with(vec![Block::new(BlockType::Unstyled, "kept")]);
        store.save(&mut editor);

        let blob = store.storage().get(KEY).unwrap().unwrap();
        assert_eq!(parse_entries(&blob).unwrap().len(), 1);
        assert_eq!(store.load_all().blocks()[0].text(), "kept");
    }

    #[test]
    fn test_save_keeps_opaque_prior_entries() {
        let mut store = store_with(MemoryStorage::new().with_entry(KEY, r#"[{"legacy":true}]"#));
        assert_eq!(store.archive_len(), 1);
        store.save(&mut EditorState::new());
        let blob = store.storage().get(KEY).unwrap().unwrap();
        let entries = parse_entries(&blob).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["legacy"], true);
    }

    #[test]
    fn test_failed_write_keeps_in_memory_archive() {
        let mut store = store_with(MemoryStorage::new().with_quota(4));
        let mut editor = editor_with(vec![Block::new(BlockType::Unstyled, "too big")]);
        let report = store.save(&mut editor);

        assert_eq!(
            report,
            SaveReport {
                archived: 1,
                persisted: false
            }
        );
        assert_eq!(store.archive_len(), 1);
        assert!(store.storage().get(KEY).unwrap().is_none());
        assert!(!editor.document().has_text());
    }

    #[test]
    fn test_delete_all_without_archive() {
        let mut store = store_with(MemoryStorage::new());
        let mut editor = EditorState::new();
        editor.insert_text("draft");
        store.delete_all(&mut editor);
        assert!(store.storage().get(KEY).unwrap().is_none());
        assert!(!editor.document().has_text());
    }

    #[test]
    fn test_delete_all_removes_archive() {
        let mut store = store_with(MemoryStorage::new());
        store.save(&mut editor_with(vec![Block::new(BlockType::Unstyled, "x")]));
        store.delete_all(&mut EditorState::new());
        assert_eq!(store.archive_len(), 0);
        assert!(store.storage().get(KEY).unwrap().is_none());
        assert_eq!(store.load_all(), Document::empty());
    }

    #[test]
    fn test_unreadable_storage_loads_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        // A directory where the value file should be makes reads fail
        std::fs::create_dir_all(storage.path_for(KEY)).unwrap();
        let store = DocumentStore::open(Box::new(storage), KEY);
        assert_eq!(store.load_all(), Document::empty());
    }

    #[test]
    fn test_empty_array_loads_empty_document() {
        let store = store_with(MemoryStorage::new().with_entry(KEY, "[]"));
        assert_eq!(store.load_all(), Document::empty());
    }
}
