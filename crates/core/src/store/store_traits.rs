//! Persistence contract for the record store.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{Error, Result};

/// Loads and saves the serialized document.
///
/// The store owns parsing and migration; repositories only move the JSON
/// payload in and out of their medium.
#[async_trait]
pub trait DocumentRepositoryTrait: Send + Sync {
    /// Returns the stored payload, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored payload.
    async fn save(&self, payload: String) -> Result<()>;
}

/// Keeps the payload in memory. Used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    payload: Mutex<Option<String>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Mutex::new(Some(payload.into())),
        }
    }

    /// Overwrites the payload behind the store's back, as another writer would.
    pub fn set_payload(&self, payload: impl Into<String>) -> Result<()> {
        *self.lock()? = Some(payload.into());
        Ok(())
    }

    pub fn payload(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.payload
            .lock()
            .map_err(|e| Error::Unexpected(format!("Document lock poisoned: {}", e)))
    }
}

#[async_trait]
impl DocumentRepositoryTrait for InMemoryDocumentRepository {
    fn load(&self) -> Result<Option<String>> {
        self.payload()
    }

    async fn save(&self, payload: String) -> Result<()> {
        self.set_payload(payload)
    }
}
