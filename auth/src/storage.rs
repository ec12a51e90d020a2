//! Durable session storage
//!
//! Two operations, modeled explicitly: `save` writes the whole session
//! blob (or clears it), `load` reads it back. Hydration completion is
//! signaled separately through the reducer, not through storage hooks.

use crate::state::PersistedSession;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Errors from the storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored blob failed to serialize or deserialize
    #[error("Session blob is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable storage for the session blob
///
/// Implementations persist the whole blob on every save; there is no
/// partial update.
pub trait SessionStorage: Send + Sync {
    /// Read the stored session, `None` when nothing is stored
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be read or the
    /// blob does not parse.
    fn load(&self) -> Result<Option<PersistedSession>, StorageError>;

    /// Write the session blob; `None` clears storage
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be written.
    fn save(&self, session: Option<&PersistedSession>) -> Result<(), StorageError>;
}

/// Session storage backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create storage rooted at the given file path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, session: Option<&PersistedSession>) -> Result<(), StorageError> {
        match session {
            Some(session) => {
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&self.path, serde_json::to_vec(session)?)?;
            },
            None => match std::fs::remove_file(&self.path) {
                Ok(()) => {},
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }
}

/// In-memory session storage for tests and tooling
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<Option<PersistedSession>>,
}

impl MemoryStorage {
    /// Create empty in-memory storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-seeded with a session blob
    #[must_use]
    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: Option<&PersistedSession>) -> Result<(), StorageError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = session.cloned();
        Ok(())
    }
}
