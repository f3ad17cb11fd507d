//! Document persistence.
//!
//! - [`Storage`]: the key-value port, with in-memory and file backends
//! - [`DocumentStore`]: the saved-document archive kept under one key

mod archive;
mod storage;

pub use archive::{
    ArchiveError, DEFAULT_STORAGE_KEY, DocumentStore, SaveReport, decode_archive, parse_entries,
};
pub use storage::{DEFAULT_QUOTA_BYTES, FileStorage, MemoryStorage, Storage, StorageError};
