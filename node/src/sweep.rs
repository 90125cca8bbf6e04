//! Consensus sweep — merges buffered votes and decides.
//!
//! Runs on a fixed period over every transaction open for voting. Per
//! transaction, under that transaction's lock: merge the pending buffer
//! into the durable record (first vote per validator wins), evaluate the
//! two majorities, and on a decision publish exactly once and retire the
//! entry. Retirement happens inside the same lock that observed the
//! threshold crossing, so no later pass can see the same crossing again.

use std::sync::Arc;
use std::time::Instant;

use cord_consensus::{ConsensusResult, MajorityOutcome, VoteRecord};
use cord_store::VoteRecordStore;
use cord_types::Timestamp;

use crate::indexer::TransactionIndexer;
use crate::metrics::NodeMetrics;
use crate::publisher::DecisionPublisher;
use crate::voting_registry::VotingRegistry;
use crate::NodeError;

pub struct ConsensusSweep {
    registry: Arc<VotingRegistry>,
    records: Arc<dyn VoteRecordStore + Send + Sync>,
    indexer: Arc<TransactionIndexer>,
    publisher: DecisionPublisher,
    metrics: Arc<NodeMetrics>,
}

impl ConsensusSweep {
    pub fn new(
        registry: Arc<VotingRegistry>,
        records: Arc<dyn VoteRecordStore + Send + Sync>,
        indexer: Arc<TransactionIndexer>,
        publisher: DecisionPublisher,
        metrics: Arc<NodeMetrics>,
    ) -> Self {
        Self {
            registry,
            records,
            indexer,
            publisher,
            metrics,
        }
    }

    /// Run one sweep pass over all open transactions.
    ///
    /// Returns the number of decisions published. Per-transaction merge
    /// problems are logged and skipped — the pending buffer is kept so the
    /// next pass retries, and re-merging is harmless because the record
    /// discards duplicate voters. Only a failure on the decision path
    /// (index assignment, publication, final persist) escalates, since
    /// retrying it blindly could publish twice.
    pub async fn run_pass(&self) -> Result<usize, NodeError> {
        let started = Instant::now();
        let mut decided = 0;

        for hash in self.registry.open_hashes() {
            // The entry can disappear between the walk and the lookup; that
            // just means another path already retired it.
            let Some(entry) = self.registry.entry(&hash) else {
                continue;
            };
            let mut voting = entry.lock().await;
            if voting.retired || voting.pending.is_empty() {
                continue;
            }

            let mut record = match self.load_record_for_merge(&hash) {
                Some(record) => record,
                None => continue,
            };

            for vote in &voting.pending {
                record.record_vote(*vote);
            }

            let outcome = record.evaluate();
            let record_bytes = match bincode::serialize(&record) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(tx = %hash, error = %e, "failed to serialize vote record");
                    continue;
                }
            };

            match outcome {
                MajorityOutcome::Undecided => {
                    // Persist the merge; on failure keep the buffer so the
                    // next pass re-merges the same votes.
                    match self.records.put_record(&hash, &record_bytes) {
                        Ok(()) => voting.pending.clear(),
                        Err(e) => {
                            tracing::error!(tx = %hash, error = %e, "failed to persist vote record");
                        }
                    }
                    tracing::debug!(
                        tx = %hash,
                        votes = record.vote_count(),
                        authorized = record.authorized_count(),
                        "majority undecided"
                    );
                }
                MajorityOutcome::Valid | MajorityOutcome::Invalid => {
                    let is_valid = outcome == MajorityOutcome::Valid;
                    self.records.put_record(&hash, &record_bytes)?;
                    let index = self.indexer.assign()?;
                    let result = ConsensusResult::new(hash, is_valid, index, Timestamp::now());
                    self.publisher.publish(&result)?;

                    voting.pending.clear();
                    voting.retired = true;
                    drop(voting);
                    self.registry.remove(&hash);

                    self.metrics.decisions_published.inc();
                    decided += 1;
                    tracing::info!(
                        tx = %hash,
                        valid = is_valid,
                        index,
                        "vote majority achieved"
                    );
                }
            }
        }

        self.metrics.open_votes.set(self.registry.len() as i64);
        self.metrics
            .sweep_duration_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);
        Ok(decided)
    }

    fn load_record_for_merge(&self, hash: &cord_types::TxHash) -> Option<VoteRecord> {
        match self.records.get_record(hash) {
            Ok(Some(bytes)) => match bincode::deserialize(&bytes) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::error!(tx = %hash, error = %e, "stored vote record is corrupt");
                    None
                }
            },
            Ok(None) => {
                tracing::warn!(tx = %hash, "open voting entry has no stored record");
                None
            }
            Err(e) => {
                tracing::error!(tx = %hash, error = %e, "failed to load vote record");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cord_consensus::{LiveSet, SubmitOutcome, Vote};
    use cord_network::Broadcaster;
    use cord_store::TransactionStore;
    use cord_nullables::NullStore;
    use cord_types::{NodeId, TxHash};
    use std::time::Duration;
    use tokio::sync::{mpsc, RwLock};

    use crate::intake::VoteIntake;
    use crate::stored_transaction::StoredTransaction;

    fn tx(n: u8) -> TxHash {
        TxHash::new([n; 32])
    }

    fn voter(n: u8) -> NodeId {
        NodeId::new([n; 32])
    }

    struct Harness {
        intake: VoteIntake,
        sweep: ConsensusSweep,
        store: Arc<NullStore>,
        outbound: mpsc::Receiver<cord_network::PropagationMessage>,
    }

    fn harness(live_voters: &[NodeId]) -> Harness {
        let registry = Arc::new(VotingRegistry::new());
        let store = Arc::new(NullStore::new());
        let metrics = Arc::new(NodeMetrics::new());
        let live_set = Arc::new(RwLock::new(LiveSet::new()));
        {
            let mut set = live_set.try_write().unwrap();
            set.replace(live_voters.iter().copied().collect());
        }

        let (outbound_tx, outbound) = mpsc::channel(64);
        let intake = VoteIntake::new(
            Arc::clone(&registry),
            Arc::clone(&store) as _,
            live_set,
            Duration::from_millis(20),
            Arc::clone(&metrics),
        );
        let indexer = Arc::new(TransactionIndexer::open(Arc::clone(&store) as _).unwrap());
        let publisher =
            DecisionPublisher::new(Arc::clone(&store) as _, Broadcaster::new(outbound_tx));
        let sweep = ConsensusSweep::new(
            Arc::clone(&registry),
            Arc::clone(&store) as _,
            indexer,
            publisher,
            metrics,
        );

        Harness {
            intake,
            sweep,
            store,
            outbound,
        }
    }

    fn seed_transaction(store: &NullStore, hash: TxHash) {
        let stored = StoredTransaction::new(hash, b"tx".to_vec());
        store
            .put_transaction(&hash, &bincode::serialize(&stored).unwrap())
            .unwrap();
    }

    async fn submit(h: &Harness, hash: TxHash, n: u8, is_valid: bool) -> SubmitOutcome {
        h.intake
            .submit_vote(Vote::new(hash, voter(n), is_valid))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn positive_majority_publishes_once() {
        let mut h = harness(&[voter(1), voter(2), voter(3)]);
        seed_transaction(&h.store, tx(1));
        h.intake.open_voting(tx(1)).await.unwrap();

        submit(&h, tx(1), 1, true).await;
        submit(&h, tx(1), 2, true).await;

        assert_eq!(h.sweep.run_pass().await.unwrap(), 1);

        let msg = h.outbound.recv().await.unwrap();
        let result: ConsensusResult = bincode::deserialize(&msg.payload).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.tx_hash, tx(1));

        // No second result: further passes find nothing open.
        assert_eq!(h.sweep.run_pass().await.unwrap(), 0);
        assert!(h.outbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn votes_after_decision_report_already_decided() {
        let h = harness(&[voter(1), voter(2), voter(3)]);
        seed_transaction(&h.store, tx(2));
        h.intake.open_voting(tx(2)).await.unwrap();

        submit(&h, tx(2), 1, true).await;
        submit(&h, tx(2), 2, true).await;
        h.sweep.run_pass().await.unwrap();

        assert_eq!(submit(&h, tx(2), 3, true).await, SubmitOutcome::AlreadyDecided);
    }

    #[tokio::test]
    async fn asymmetric_negative_majority_decides_early() {
        // Authorized set of 5, three votes in, two invalid: negative
        // consensus (2 > 3/2) fires although positive quorum needs 3 of 5.
        let mut h = harness(&[voter(1), voter(2), voter(3), voter(4), voter(5)]);
        seed_transaction(&h.store, tx(3));
        h.intake.open_voting(tx(3)).await.unwrap();

        submit(&h, tx(3), 1, false).await;
        submit(&h, tx(3), 2, false).await;
        submit(&h, tx(3), 3, true).await;

        assert_eq!(h.sweep.run_pass().await.unwrap(), 1);
        let msg = h.outbound.recv().await.unwrap();
        let result: ConsensusResult = bincode::deserialize(&msg.payload).unwrap();
        assert!(!result.is_valid);
    }

    #[tokio::test]
    async fn undecided_record_stays_open_across_passes() {
        let h = harness(&[voter(1), voter(2), voter(3), voter(4), voter(5)]);
        seed_transaction(&h.store, tx(4));
        h.intake.open_voting(tx(4)).await.unwrap();

        submit(&h, tx(4), 1, true).await;
        assert_eq!(h.sweep.run_pass().await.unwrap(), 0);

        // Still open; a later vote pushes it over.
        submit(&h, tx(4), 2, true).await;
        submit(&h, tx(4), 3, true).await;
        assert_eq!(h.sweep.run_pass().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_votes_across_sweeps_count_once() {
        let h = harness(&[voter(1), voter(2), voter(3)]);
        seed_transaction(&h.store, tx(5));
        h.intake.open_voting(tx(5)).await.unwrap();

        submit(&h, tx(5), 1, true).await;
        h.sweep.run_pass().await.unwrap();

        // Same voter flips; the first recorded vote stands and the tally
        // does not double-count.
        submit(&h, tx(5), 1, false).await;
        assert_eq!(h.sweep.run_pass().await.unwrap(), 0);

        let bytes = h.store.get_record(&tx(5)).unwrap().unwrap();
        let record: VoteRecord = bincode::deserialize(&bytes).unwrap();
        assert_eq!(record.vote_count(), 1);
        assert_eq!(record.vote_of(&voter(1)).map(|v| v.is_valid), Some(true));
    }

    #[tokio::test]
    async fn decision_indexes_are_sequential() {
        let mut h = harness(&[voter(1)]);
        for n in [1u8, 2] {
            seed_transaction(&h.store, tx(n));
            h.intake.open_voting(tx(n)).await.unwrap();
            submit(&h, tx(n), 1, true).await;
        }

        assert_eq!(h.sweep.run_pass().await.unwrap(), 2);

        let mut indices = Vec::new();
        for _ in 0..2 {
            let msg = h.outbound.recv().await.unwrap();
            let result: ConsensusResult = bincode::deserialize(&msg.payload).unwrap();
            indices.push(result.index);
        }
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1]);
    }

    #[tokio::test]
    async fn missing_stored_transaction_escalates() {
        // The transaction was never written to the transaction store; the
        // decision cannot be made durable, so the pass fails hard.
        let h = harness(&[voter(1)]);
        h.intake.open_voting(tx(6)).await.unwrap();
        submit(&h, tx(6), 1, true).await;

        let err = h.sweep.run_pass().await.unwrap_err();
        assert!(matches!(err, NodeError::MissingTransaction(_)));
    }

    #[tokio::test]
    async fn empty_authorized_set_never_decides_positive() {
        let h = harness(&[]);
        seed_transaction(&h.store, tx(7));
        h.intake.open_voting(tx(7)).await.unwrap();

        // Nobody is authorized, so no vote can even be buffered.
        assert_eq!(submit(&h, tx(7), 1, true).await, SubmitOutcome::UnauthorizedVoter);
        assert_eq!(h.sweep.run_pass().await.unwrap(), 0);
        assert!(h.sweep.registry.entry(&tx(7)).is_some());
    }
}
