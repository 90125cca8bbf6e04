//! Vote record storage trait.

use crate::StoreError;
use cord_types::TxHash;

/// Durable storage for per-transaction vote records.
///
/// Values are serialized bytes (the node serializes
/// `cord_consensus::VoteRecord` with bincode). A record is written when
/// voting opens, rewritten by every sweep merge, and kept after the
/// decision so late votes can be told apart from votes for transactions
/// that never opened.
pub trait VoteRecordStore {
    /// Store a vote record, replacing any existing one for the hash.
    fn put_record(&self, hash: &TxHash, record_bytes: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a vote record by transaction hash.
    fn get_record(&self, hash: &TxHash) -> Result<Option<Vec<u8>>, StoreError>;

    /// Delete a vote record.
    fn delete_record(&self, hash: &TxHash) -> Result<(), StoreError>;

    /// Iterate all stored records as `(hash, bytes)` pairs.
    fn iter_records(&self) -> Result<Vec<(TxHash, Vec<u8>)>, StoreError>;
}
