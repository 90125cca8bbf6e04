//! The main CORD node struct — wires the consensus subsystems together.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use cord_consensus::{LiveSet, SubmitOutcome, Vote};
use cord_network::{Broadcaster, MembershipProbe, PropagationMessage};
use cord_store::{MetaStore, TransactionStore, VoteRecordStore};
use cord_store_lmdb::LmdbEnvironment;
use cord_types::{NodeId, TxHash};

use crate::config::NodeConfig;
use crate::indexer::TransactionIndexer;
use crate::intake::VoteIntake;
use crate::metrics::NodeMetrics;
use crate::publisher::DecisionPublisher;
use crate::shutdown::ShutdownController;
use crate::sweep::ConsensusSweep;
use crate::voting_registry::VotingRegistry;
use crate::NodeError;

/// Default LMDB map size: 1 GiB.
const DEFAULT_MAP_SIZE: usize = 1 << 30;
/// Number of named LMDB databases.
const MAX_DBS: u32 = 8;
/// Timeout for waiting on background tasks during shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A running CORD node.
pub struct CordNode {
    pub config: NodeConfig,
    /// Live validator set, owned by the membership probe.
    pub live_set: Arc<RwLock<LiveSet>>,
    /// Transactions currently open for voting.
    pub registry: Arc<VotingRegistry>,
    pub metrics: Arc<NodeMetrics>,
    pub shutdown: Arc<ShutdownController>,

    intake: Arc<VoteIntake>,
    sweep: Arc<ConsensusSweep>,
    probe: Arc<MembershipProbe>,
    /// Outbound propagation queue; the connection layer takes this.
    outbound_rx: Option<mpsc::Receiver<PropagationMessage>>,
    task_handles: Vec<JoinHandle<()>>,
}

impl CordNode {
    /// Build a node over an LMDB environment in `config.data_dir`.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let env = LmdbEnvironment::open(&config.data_dir, MAX_DBS, DEFAULT_MAP_SIZE)?;
        let records: Arc<dyn VoteRecordStore + Send + Sync> = Arc::new(env.vote_record_store());
        let transactions: Arc<dyn TransactionStore + Send + Sync> =
            Arc::new(env.transaction_store());
        let meta: Arc<dyn MetaStore + Send + Sync> = Arc::new(env.meta_store());
        Self::with_stores(config, records, transactions, meta)
    }

    /// Build a node over injected stores (tests use the nullable backends).
    pub fn with_stores(
        config: NodeConfig,
        records: Arc<dyn VoteRecordStore + Send + Sync>,
        transactions: Arc<dyn TransactionStore + Send + Sync>,
        meta: Arc<dyn MetaStore + Send + Sync>,
    ) -> Result<Self, NodeError> {
        let metrics = Arc::new(NodeMetrics::new());
        let live_set = Arc::new(RwLock::new(LiveSet::new()));
        let registry = Arc::new(VotingRegistry::new());
        let shutdown = Arc::new(ShutdownController::new());

        let probe = Arc::new(MembershipProbe::with_timeout(
            config.validators.clone(),
            Arc::clone(&live_set),
            Duration::from_secs(config.probe_timeout_secs),
        ));

        let (outbound_tx, outbound_rx) = mpsc::channel(config.outbound_capacity);
        let broadcaster = Broadcaster::new(outbound_tx);

        let intake = Arc::new(VoteIntake::new(
            Arc::clone(&registry),
            Arc::clone(&records),
            Arc::clone(&live_set),
            Duration::from_millis(config.intake_grace_ms),
            Arc::clone(&metrics),
        ));

        let indexer = Arc::new(TransactionIndexer::open(meta)?);
        let publisher = DecisionPublisher::new(transactions, broadcaster);
        let sweep = Arc::new(ConsensusSweep::new(
            Arc::clone(&registry),
            records,
            indexer,
            publisher,
            Arc::clone(&metrics),
        ));

        Ok(Self {
            config,
            live_set,
            registry,
            metrics,
            shutdown,
            intake,
            sweep,
            probe,
            outbound_rx: Some(outbound_rx),
            task_handles: Vec::new(),
        })
    }

    /// Spawn the background tasks: membership refresh and consensus sweep.
    ///
    /// Both run on fixed periods with skip-if-busy semantics — a cycle
    /// still in flight suppresses its own next trigger rather than queuing.
    pub fn start(&mut self) {
        // ── Membership refresh ─────────────────────────────────────────
        let probe = Arc::clone(&self.probe);
        let probe_metrics = Arc::clone(&self.metrics);
        let mut probe_shutdown = self.shutdown.subscribe();
        let probe_interval = Duration::from_secs(self.config.probe_interval_secs);

        let probe_handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(probe_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = probe_shutdown.recv() => {
                        tracing::info!("membership probe task shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let live = probe.refresh().await;
                        probe_metrics.live_validators.set(live as i64);
                    }
                }
            }
        });
        self.task_handles.push(probe_handle);

        // ── Consensus sweep ────────────────────────────────────────────
        let sweep = Arc::clone(&self.sweep);
        let shutdown = Arc::clone(&self.shutdown);
        let mut sweep_shutdown = self.shutdown.subscribe();
        let sweep_interval = Duration::from_millis(self.config.sweep_interval_ms);

        let sweep_handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = sweep_shutdown.recv() => {
                        tracing::info!("consensus sweep task shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match sweep.run_pass().await {
                            Ok(0) => {}
                            Ok(decided) => {
                                tracing::debug!(decided, "sweep pass finished");
                            }
                            Err(e) => {
                                // A decided transaction could not be made
                                // durable. Retrying could publish twice, so
                                // surface the failure and stop the node.
                                tracing::error!(error = %e, "fatal consensus sweep failure");
                                shutdown.shutdown();
                                break;
                            }
                        }
                    }
                }
            }
        });
        self.task_handles.push(sweep_handle);

        tracing::info!(
            validators = self.config.validators.len(),
            probe_interval_secs = self.config.probe_interval_secs,
            sweep_interval_ms = self.config.sweep_interval_ms,
            "node started"
        );
    }

    /// Signal shutdown and wait for the background tasks to stop.
    pub async fn stop(&mut self) {
        self.shutdown.shutdown();
        for handle in self.task_handles.drain(..) {
            if tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await.is_err() {
                tracing::warn!("background task did not stop within the shutdown timeout");
            }
        }
        tracing::info!("node stopped");
    }

    /// Run until SIGINT/SIGTERM.
    pub async fn run(&mut self) {
        self.start();
        self.shutdown.wait_for_signal().await;
        self.stop().await;
    }

    /// Open voting for a transaction entering the DAG.
    pub async fn open_voting(&self, tx_hash: TxHash) -> Result<(), NodeError> {
        self.intake.open_voting(tx_hash).await
    }

    /// Submit a validator's vote, as delivered by the inbound message handler.
    pub async fn submit_vote(
        &self,
        tx_hash: TxHash,
        voter: NodeId,
        is_valid: bool,
    ) -> Result<SubmitOutcome, NodeError> {
        self.intake.submit_vote(Vote::new(tx_hash, voter, is_valid)).await
    }

    /// Hand the outbound propagation queue to the connection layer.
    ///
    /// Can only be taken once.
    pub fn take_outbound(&mut self) -> Option<mpsc::Receiver<PropagationMessage>> {
        self.outbound_rx.take()
    }
}
