//! In-memory agent repository for testing.
//!
//! This adapter provides a pure in-memory implementation of AgentRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{Result, error::Error, ports::AgentRepository, q_learning::SavedAgent};

/// In-memory repository for testing.
///
/// Snapshots are encoded to MessagePack bytes exactly like the file adapter,
/// so a round trip through this repository exercises the same serialization.
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // a poisoned lock only means another test thread panicked mid-insert
        self.storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get the number of snapshots currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored snapshots.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if a snapshot exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        let key = path.to_string_lossy().to_string();
        self.storage().contains_key(&key)
    }
}

impl AgentRepository for InMemoryRepository {
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();

        let bytes = rmp_serde::to_vec_named(agent).map_err(|e| Error::SerializationContext {
            operation: "serialize agent for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<Option<SavedAgent>> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage();

        let Some(bytes) = storage.get(&key) else {
            return Ok(None);
        };

        let agent: SavedAgent =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "deserialize agent from in-memory storage".to_string(),
                message: e.to_string(),
            })?;
        agent.check_version()?;
        Ok(Some(agent))
    }
}
