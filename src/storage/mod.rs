use crate::models::TodoDocument;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub mod json;
pub mod memory;
#[cfg(test)]
pub(crate) mod test_utils;

pub use json::{JsonStorage, LoadPolicy};
pub use memory::MemoryStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Corrupt document at {}: {}", .path.display(), .source)]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Whole-document persistence. Implementations read and write the complete
/// document; there are no partial updates.
pub trait Storage: Send + Sync {
    fn load(&self) -> Result<TodoDocument, StorageError>;
    fn save(&self, data: &TodoDocument) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn load(&self) -> Result<TodoDocument, StorageError> {
        (**self).load()
    }

    fn save(&self, data: &TodoDocument) -> Result<(), StorageError> {
        (**self).save(data)
    }
}
