//! Finalization index assignment.
//!
//! Every decided transaction receives a monotonically increasing index.
//! The network-wide determinism guarantee is the index authority's concern;
//! locally this persists a counter through the meta store so indices never
//! repeat across restarts.

use std::sync::{Arc, Mutex};

use cord_store::{MetaStore, StoreError};

use crate::NodeError;

/// Meta-store key under which the next index is persisted.
const INDEX_COUNTER_KEY: &str = "finalization_index";

/// Assigns finalization indices to decided transactions.
pub struct TransactionIndexer {
    meta: Arc<dyn MetaStore + Send + Sync>,
    next: Mutex<u64>,
}

impl TransactionIndexer {
    /// Load the indexer, resuming from the persisted counter if present.
    pub fn open(meta: Arc<dyn MetaStore + Send + Sync>) -> Result<Self, NodeError> {
        let next = match meta.get_meta(INDEX_COUNTER_KEY)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Serialization("finalization index counter corrupt".into())
                })?;
                u64::from_le_bytes(arr)
            }
            None => 0,
        };
        Ok(Self {
            meta,
            next: Mutex::new(next),
        })
    }

    /// Assign the next index.
    ///
    /// The incremented counter is persisted before the index is returned;
    /// a persist failure means no index was consumed.
    pub fn assign(&self) -> Result<u64, NodeError> {
        let mut next = self.next.lock().expect("indexer lock poisoned");
        let index = *next;
        self.meta
            .put_meta(INDEX_COUNTER_KEY, &(index + 1).to_le_bytes())?;
        *next = index + 1;
        Ok(index)
    }
}
