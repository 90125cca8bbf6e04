//! Vote intake — gates and buffers inbound validator votes.
//!
//! Intake does no tallying: a vote is checked against the transaction's
//! frozen authorized-voter snapshot, appended to the pending buffer under
//! the transaction's lock, and the caller gets one of four distinguishable
//! outcomes. Keeping this path light decouples ingestion latency from the
//! heavier sweep cadence.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use cord_consensus::{LiveSet, SubmitOutcome, Vote, VoteRecord};
use cord_store::VoteRecordStore;
use cord_types::{Timestamp, TxHash};

use crate::metrics::NodeMetrics;
use crate::voting_registry::VotingRegistry;
use crate::NodeError;

pub struct VoteIntake {
    registry: Arc<VotingRegistry>,
    records: Arc<dyn VoteRecordStore + Send + Sync>,
    live_set: Arc<RwLock<LiveSet>>,
    /// How long to wait for an out-of-order vote's record to appear.
    grace: Duration,
    metrics: Arc<NodeMetrics>,
}

impl VoteIntake {
    pub fn new(
        registry: Arc<VotingRegistry>,
        records: Arc<dyn VoteRecordStore + Send + Sync>,
        live_set: Arc<RwLock<LiveSet>>,
        grace: Duration,
        metrics: Arc<NodeMetrics>,
    ) -> Self {
        Self {
            registry,
            records,
            live_set,
            grace,
            metrics,
        }
    }

    /// Open voting for a transaction entering the DAG.
    ///
    /// Snapshots the current live validator set as the authorized voters,
    /// persists an empty vote record, and opens the pending buffer.
    /// Idempotent: a transaction that is already open — or already decided —
    /// is left untouched.
    pub async fn open_voting(&self, tx_hash: TxHash) -> Result<(), NodeError> {
        if self.registry.entry(&tx_hash).is_some() {
            tracing::debug!(tx = %tx_hash, "voting already open");
            return Ok(());
        }
        if self.records.get_record(&tx_hash)?.is_some() {
            tracing::debug!(tx = %tx_hash, "vote record already exists — not reopening");
            return Ok(());
        }

        let authorized = self.live_set.read().await.snapshot();
        if authorized.is_empty() {
            tracing::warn!(
                tx = %tx_hash,
                "opening voting with an empty validator set — positive consensus unreachable"
            );
        }

        // Open the buffer before persisting: a vote racing this call then
        // sees "record missing" (covered by the grace retry), never the
        // misleading "already decided".
        if !self.registry.open(tx_hash) {
            return Ok(());
        }

        let record = VoteRecord::new(tx_hash, authorized, Timestamp::now());
        let bytes = bincode::serialize(&record)?;
        if let Err(e) = self.records.put_record(&tx_hash, &bytes) {
            self.registry.remove(&tx_hash);
            return Err(e.into());
        }

        self.metrics.open_votes.set(self.registry.len() as i64);
        tracing::info!(
            tx = %tx_hash,
            authorized = record.authorized_count(),
            "voting opened"
        );
        Ok(())
    }

    /// Submit one validator vote.
    ///
    /// Returns a [`SubmitOutcome`]; a store failure is a separate error.
    /// The only wait on this path is the single grace-period retry when a
    /// vote beats its own `open_voting` — it blocks this call only, never
    /// the registry.
    pub async fn submit_vote(&self, vote: Vote) -> Result<SubmitOutcome, NodeError> {
        self.metrics.votes_received.inc();

        let mut record = self.load_record(&vote.tx_hash)?;
        if record.is_none() {
            tokio::time::sleep(self.grace).await;
            record = self.load_record(&vote.tx_hash)?;
        }
        let Some(record) = record else {
            tracing::debug!(tx = %vote.tx_hash, voter = %vote.voter, "vote for unknown transaction");
            return Ok(SubmitOutcome::UnknownTransaction);
        };

        if !record.is_authorized(&vote.voter) {
            self.metrics.votes_unauthorized.inc();
            tracing::warn!(
                tx = %vote.tx_hash,
                voter = %vote.voter,
                "unauthorized vote received"
            );
            return Ok(SubmitOutcome::UnauthorizedVoter);
        }

        let Some(entry) = self.registry.entry(&vote.tx_hash) else {
            return Ok(SubmitOutcome::AlreadyDecided);
        };
        let mut voting = entry.lock().await;
        if voting.retired {
            return Ok(SubmitOutcome::AlreadyDecided);
        }
        voting.pending.push(vote);
        self.metrics.votes_accepted.inc();
        Ok(SubmitOutcome::Accepted)
    }

    fn load_record(&self, tx_hash: &TxHash) -> Result<Option<VoteRecord>, NodeError> {
        match self.records.get_record(tx_hash)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }
}
