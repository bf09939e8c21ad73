use std::sync::Arc;
use tracing::{info, warn};

use crate::{error::RegistryError, model::CityRecord, store::CityStore};

/// What to do with previously stored cities when the registry is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPolicy {
    /// Wipe the store before serving anything.
    ResetOnStart,
    /// Keep whatever the store already holds.
    Keep,
}

impl InitPolicy {
    pub fn from_reset_flag(reset_on_start: bool) -> Self {
        if reset_on_start { Self::ResetOnStart } else { Self::Keep }
    }
}

/// The deduplicated set of watched cities.
///
/// Every call goes straight to the store; there is no separate cache.
#[derive(Clone)]
pub struct CityRegistry {
    store: Arc<dyn CityStore>,
}

impl CityRegistry {
    pub fn open(store: Arc<dyn CityStore>, policy: InitPolicy) -> Result<Self, RegistryError> {
        if policy == InitPolicy::ResetOnStart {
            warn!("reset_on_start is enabled: clearing all watched cities");
            store.clear()?;
        }
        Ok(Self { store })
    }

    pub fn add(&self, name: &str) -> Result<(), RegistryError> {
        self.store.insert(name)?;
        info!(city = name, "city added to registry");
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<(), RegistryError> {
        if !self.store.delete(name)? {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        info!(city = name, "city removed from registry");
        Ok(())
    }

    pub fn contains(&self, name: &str) -> Result<bool, RegistryError> {
        Ok(self.store.contains(name)?)
    }

    /// Order is whatever the store yields; callers must not rely on it.
    pub fn list(&self) -> Result<Vec<CityRecord>, RegistryError> {
        Ok(self.store.list()?.into_iter().map(CityRecord::new).collect())
    }
}

impl std::fmt::Debug for CityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CityRegistry").finish_non_exhaustive()
    }
}
