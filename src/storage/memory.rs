//! In-memory document storage, for tests and for embedding the store without a file.

use super::{Storage, StorageError};
use crate::models::TodoDocument;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: RwLock<TodoDocument>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: TodoDocument) -> Self {
        Self {
            document: RwLock::new(document),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Storage for MemoryStorage {
    fn save(&self, data: &TodoDocument) -> Result<(), StorageError> {
        let mut document = self
            .document
            .write()
            .map_err(|e| StorageError::Storage(format!("Failed to lock document: {}", e)))?;
        *document = data.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load(&self) -> Result<TodoDocument, StorageError> {
        let document = self
            .document
            .read()
            .map_err(|e| StorageError::Storage(format!("Failed to lock document: {}", e)))?;
        Ok(document.clone())
    }
}
