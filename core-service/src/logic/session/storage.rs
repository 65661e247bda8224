//! Session Storage
//!
//! Key-value persistence for the dashboard session. One entry, one key.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use super::SessionData;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Backing store of the persisted session
pub trait SessionStore: Send + Sync {
    /// Read the stored session, `None` when nothing was stored yet
    fn load(&self) -> Result<Option<SessionData>, StorageError>;

    /// Overwrite the stored session
    fn save(&self, data: &SessionData) -> Result<(), StorageError>;

    /// Remove the stored session
    fn clear(&self) -> Result<(), StorageError>;

    /// Human readable location, for logs
    fn describe(&self) -> String;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn load(&self) -> Result<Option<SessionData>, StorageError> {
        (**self).load()
    }

    fn save(&self, data: &SessionData) -> Result<(), StorageError> {
        (**self).save(data)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// ============================================================================
// FILE STORE
// ============================================================================

/// Session persisted as a JSON file
pub struct FileSessionStore {
    file_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionData>, StorageError> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let data = fs::read(&self.file_path)?;
        let session: SessionData = serde_json::from_slice(&data)?;
        Ok(Some(session))
    }

    fn save(&self, data: &SessionData) -> Result<(), StorageError> {
        // Ensure directory exists
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(data)?;
        fs::write(&self.file_path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.file_path.display().to_string()
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// Process-local store, nothing survives a restart
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<SessionData>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a session
    pub fn with_session(data: SessionData) -> Self {
        Self {
            slot: Mutex::new(Some(data)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionData>, StorageError> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, data: &SessionData) -> Result<(), StorageError> {
        *self.slot.lock() = Some(data.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock() = None;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
