//! Node metadata storage trait.

use crate::StoreError;

/// Small keyed values that must survive restarts: the finalization index
/// counter, schema version, and similar bookkeeping.
pub trait MetaStore {
    /// Store a metadata value under a string key.
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a metadata value.
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Delete a metadata value.
    fn delete_meta(&self, key: &str) -> Result<(), StoreError>;
}
