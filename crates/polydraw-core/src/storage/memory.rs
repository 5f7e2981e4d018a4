//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::document::SessionDocument;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, SessionDocument>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, document: &SessionDocument) -> StorageResult<()> {
        let mut docs = self.documents.write().map_err(lock_error)?;
        docs.insert(id.to_string(), document.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<SessionDocument> {
        let docs = self.documents.read().map_err(lock_error)?;
        docs.get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
