//! Decision publisher — makes a consensus result visible and durable.
//!
//! Pure hand-off: broadcast the result to the propagation layer, then
//! write it onto the stored transaction. No retry policy lives here — a
//! failed transaction-store write is a hard error surfaced to the caller,
//! because silently dropping (or silently retrying) a decided transaction
//! would break the exactly-once guarantee the rest of the network observes.

use std::sync::Arc;

use cord_consensus::ConsensusResult;
use cord_network::Broadcaster;
use cord_store::TransactionStore;

use crate::stored_transaction::StoredTransaction;
use crate::NodeError;

pub struct DecisionPublisher {
    transactions: Arc<dyn TransactionStore + Send + Sync>,
    broadcaster: Broadcaster,
}

impl DecisionPublisher {
    pub fn new(
        transactions: Arc<dyn TransactionStore + Send + Sync>,
        broadcaster: Broadcaster,
    ) -> Self {
        Self {
            transactions,
            broadcaster,
        }
    }

    /// Broadcast the result and attach it to the stored transaction.
    pub fn publish(&self, result: &ConsensusResult) -> Result<(), NodeError> {
        self.broadcaster.broadcast_result(result)?;

        let tx_bytes = self
            .transactions
            .get_transaction(&result.tx_hash)?
            .ok_or(NodeError::MissingTransaction(result.tx_hash))?;
        let mut stored: StoredTransaction = bincode::deserialize(&tx_bytes)?;
        stored.consensus_result = Some(*result);
        let updated = bincode::serialize(&stored)?;
        self.transactions.put_transaction(&result.tx_hash, &updated)?;

        tracing::info!(
            tx = %result.tx_hash,
            valid = result.is_valid,
            index = result.index,
            "consensus result published"
        );
        Ok(())
    }
}
