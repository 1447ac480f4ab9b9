//! A file backed store for the case document.
//!
//! The whole document is one atomic persisted blob: every mutation is
//! followed by a full re-save, never an incremental write.

use std::{io, path::PathBuf};

use crate::{domain::Document, storage::envelope};

/// The persistent slot the document lives in.
#[derive(Debug, Clone)]
pub struct Store {
    /// Path of the JSON blob.
    path: PathBuf,
}

impl Store {
    /// Opens the slot at the given path. No I/O happens until
    /// [`load`](Self::load) or [`save`](Self::save).
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The path of the underlying slot.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Reads the persisted document.
    ///
    /// A missing slot or unparseable JSON is fully absorbed and treated as
    /// "no prior data": the default empty document is returned and the
    /// problem is logged. Fields missing from older saves are filled with
    /// defaults.
    #[must_use]
    pub fn load(&self) -> Document {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No case file at {}, starting empty", self.path.display());
                return Document::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", self.path.display());
                return Document::default();
            }
        };

        envelope::decode(&text).unwrap_or_else(|e| {
            tracing::warn!(
                "Case file {} is not valid JSON, starting empty: {e}",
                self.path.display()
            );
            Document::default()
        })
    }

    /// Writes the full document to the slot.
    ///
    /// The in-memory document is not rolled back on failure; after a
    /// [`StorageError::QuotaExceeded`] the caller is expected to warn the
    /// user, who frees space and retries with a later save.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::QuotaExceeded`] when the underlying storage
    /// rejects the write for lack of space, and [`StorageError::Io`] for
    /// any other write failure.
    pub fn save(&self, document: &Document) -> Result<(), StorageError> {
        let text = envelope::encode(document)?;
        std::fs::write(&self.path, text).map_err(|e| match e.kind() {
            io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => {
                StorageError::QuotaExceeded
            }
            _ => StorageError::Io(e),
        })
    }
}

/// Errors raised when persisting the document.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The underlying storage rejected the write for lack of space. The
    /// user frees space (e.g. by removing attachments) and retries.
    #[error("storage quota exceeded; remove attachments and try again")]
    QuotaExceeded,
    /// The document could not be serialized.
    #[error("failed to serialize case file: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Any other write failure.
    #[error("failed to write case file: {0}")]
    Io(#[from] io::Error),
}
