//! Stored-transaction envelope.
//!
//! Transaction content is opaque to the consensus engine; the node stores
//! an envelope of `(hash, payload)` and attaches the consensus result to it
//! once voting finishes. The DAG layers read the payload; the result field
//! is what marks a transaction as finalized network-wide.

use serde::{Deserialize, Serialize};

use cord_consensus::ConsensusResult;
use cord_types::TxHash;

/// A transaction as persisted in the transaction store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTransaction {
    /// The transaction's hash (also its storage key).
    pub tx_hash: TxHash,
    /// Serialized transaction content, opaque here.
    pub payload: Vec<u8>,
    /// The finalized consensus result, absent while voting is open.
    pub consensus_result: Option<ConsensusResult>,
}

impl StoredTransaction {
    pub fn new(tx_hash: TxHash, payload: Vec<u8>) -> Self {
        Self {
            tx_hash,
            payload,
            consensus_result: None,
        }
    }

    /// Whether consensus has finalized this transaction.
    pub fn is_decided(&self) -> bool {
        self.consensus_result.is_some()
    }
}
