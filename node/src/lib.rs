//! CORD full node — orchestrates the quorum vote consensus engine.
//!
//! The node is the central coordinator that:
//! - Refreshes the live validator set by probing configured addresses
//! - Opens voting for transactions entering the DAG
//! - Gates and buffers inbound validator votes
//! - Periodically merges buffered votes and evaluates the two majorities
//! - Publishes each finalized decision exactly once

pub mod config;
pub mod error;
pub mod indexer;
pub mod intake;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod publisher;
pub mod shutdown;
pub mod stored_transaction;
pub mod sweep;
pub mod voting_registry;

pub use config::NodeConfig;
pub use error::NodeError;
pub use indexer::TransactionIndexer;
pub use intake::VoteIntake;
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use node::CordNode;
pub use publisher::DecisionPublisher;
pub use shutdown::ShutdownController;
pub use stored_transaction::StoredTransaction;
pub use sweep::ConsensusSweep;
pub use voting_registry::VotingRegistry;
