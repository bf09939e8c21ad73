//! Persistence handle for watched city names.
//!
//! The store owns the uniqueness constraint. Application-level duplicate
//! checks happen earlier, but a racing second insert must still be rejected
//! here with [`StoreError::UniqueViolation`].

use crate::error::StoreError;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCityStore;
pub use sqlite::SqliteCityStore;

/// Each operation is atomic with respect to the underlying storage.
pub trait CityStore: Send + Sync {
    fn insert(&self, name: &str) -> Result<(), StoreError>;

    /// Returns `false` when no row with that name existed.
    fn delete(&self, name: &str) -> Result<bool, StoreError>;

    fn contains(&self, name: &str) -> Result<bool, StoreError>;

    /// All names, in no particular order.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Drop every stored name.
    fn clear(&self) -> Result<(), StoreError>;
}
