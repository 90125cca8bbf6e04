//! The finalized consensus result.

use cord_types::{Timestamp, TxHash};
use serde::{Deserialize, Serialize};

/// The outcome of quorum voting for one transaction.
///
/// Created exactly once per transaction by the consensus sweep, broadcast
/// to the network, and written onto the stored transaction. Immutable once
/// created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// The decided transaction.
    pub tx_hash: TxHash,
    /// The network's verdict.
    pub is_valid: bool,
    /// Finalization index assigned at decision time.
    pub index: u64,
    /// When the decision was made.
    pub decided_at: Timestamp,
}

impl ConsensusResult {
    pub fn new(tx_hash: TxHash, is_valid: bool, index: u64, decided_at: Timestamp) -> Self {
        Self {
            tx_hash,
            is_valid,
            index,
            decided_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip() {
        let result = ConsensusResult::new(TxHash::new([3; 32]), false, 17, Timestamp::new(5000));
        let bytes = bincode::serialize(&result).unwrap();
        let back: ConsensusResult = bincode::deserialize(&bytes).unwrap();
        assert_eq!(result, back);
    }
}
