//! Write-through persistence of the whole battle state.
//!
//! One JSON blob under one key. Failures never reach gameplay: saving logs
//! a warning, loading falls back to "no save" and discards malformed text.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::STORAGE_KEY;

use super::error::PersistenceError;
use super::state::BattleState;

/// Raw string key-value slot.
pub trait StorageSlot {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// In-process slot for native runs and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    entries: HashMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageSlot;

#[cfg(target_arch = "wasm32")]
impl LocalStorageSlot {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(PersistenceError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageSlot for LocalStorageSlot {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| PersistenceError::Storage(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| PersistenceError::Storage(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| PersistenceError::Storage(format!("{e:?}")))
    }
}

pub struct PersistenceGateway<S> {
    slot: S,
    key: &'static str,
}

impl<S: StorageSlot> PersistenceGateway<S> {
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, STORAGE_KEY)
    }

    pub fn with_key(slot: S, key: &'static str) -> Self {
        Self { slot, key }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn into_slot(self) -> S {
        self.slot
    }

    /// Persist `state`. Failures are logged and dropped.
    pub fn save(&mut self, state: &BattleState) {
        if let Err(e) = self.try_save(state) {
            warn!(key = self.key, error = %e, "failed to save battle state");
        }
    }

    pub fn try_save(&mut self, state: &BattleState) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(state).map_err(PersistenceError::Encode)?;
        self.slot.write(self.key, &json)
    }

    /// Restore the saved state, or `None` when there is nothing usable.
    /// Unparsable or inconsistent data is removed from the slot.
    pub fn load(&mut self) -> Option<BattleState> {
        match self.try_load() {
            Ok(state) => state,
            Err(e) => {
                warn!(key = self.key, error = %e, "discarding saved battle state");
                if e.is_malformed() {
                    if let Err(e) = self.slot.remove(self.key) {
                        warn!(key = self.key, error = %e, "failed to remove malformed save");
                    }
                }
                None
            }
        }
    }

    pub fn try_load(&self) -> Result<Option<BattleState>, PersistenceError> {
        let Some(json) = self.slot.read(self.key)? else {
            debug!(key = self.key, "no saved battle state");
            return Ok(None);
        };
        let state: BattleState = serde_json::from_str(&json).map_err(PersistenceError::Decode)?;
        state.validate()?;
        Ok(Some(state))
    }
}
