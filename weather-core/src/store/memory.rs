use parking_lot::RwLock;
use std::collections::HashSet;

use super::CityStore;
use crate::error::StoreError;

/// Non-durable store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCityStore {
    names: RwLock<HashSet<String>>,
}

impl MemoryCityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}

impl CityStore for MemoryCityStore {
    fn insert(&self, name: &str) -> Result<(), StoreError> {
        if self.names.write().insert(name.to_string()) {
            Ok(())
        } else {
            Err(StoreError::UniqueViolation(name.to_string()))
        }
    }

    fn delete(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.names.write().remove(name))
    }

    fn contains(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.names.read().contains(name))
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.names.read().iter().cloned().collect())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.names.write().clear();
        Ok(())
    }
}
