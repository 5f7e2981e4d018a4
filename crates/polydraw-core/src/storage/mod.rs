//! Storage abstraction for persistence.

mod memory;
mod file;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::document::SessionDocument;
use thiserror::Error;

/// Slot used by "Save Sketch" / "Load Sketch".
pub const SKETCH_KEY: &str = "polygon-sketch";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document storage backends.
///
/// Operations run to completion on the calling thread; there is nothing to
/// await or cancel.
pub trait Storage {
    /// Save a document.
    fn save(&self, id: &str, document: &SessionDocument) -> StorageResult<()>;

    /// Load a document.
    fn load(&self, id: &str) -> StorageResult<SessionDocument>;
}
