//! User-defined constant table

use dim_core::Quantity;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Named quantities shared by every evaluation of an engine.
///
/// Each method holds the lock for a single map operation, so a panic while
/// it is held cannot leave the map half-written; a poisoned lock is taken
/// over as is.
#[derive(Debug, Default)]
pub struct ConstantTable {
    entries: RwLock<HashMap<String, Quantity>>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Quantity>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Quantity>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lookup(&self, name: &str) -> Option<Quantity> {
        self.read().get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Insert or overwrite, returning the previous value
    pub fn insert(&self, name: &str, value: Quantity) -> Option<Quantity> {
        self.write().insert(name.to_string(), value)
    }

    /// Remove if present
    pub fn remove(&self, name: &str) -> Option<Quantity> {
        self.write().remove(name)
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Defined names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }
}
