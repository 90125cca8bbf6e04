//! Transaction storage trait.

use crate::StoreError;
use cord_types::TxHash;

/// Trait for transaction storage.
///
/// The consensus engine only reads a transaction to attach its decision and
/// writes it back; everything else about transaction content is opaque here.
pub trait TransactionStore {
    /// Store a transaction (serialized bytes keyed by hash).
    fn put_transaction(&self, hash: &TxHash, tx_bytes: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a transaction by hash.
    fn get_transaction(&self, hash: &TxHash) -> Result<Option<Vec<u8>>, StoreError>;

    /// Check if a transaction exists.
    fn exists(&self, hash: &TxHash) -> Result<bool, StoreError>;

    /// Delete a transaction.
    fn delete_transaction(&self, hash: &TxHash) -> Result<(), StoreError>;
}
