//! Consensus — per-transaction validity decided by quorum voting.
//!
//! Each transaction entering the DAG is put to a vote among the validator
//! nodes that were live when voting opened. Votes accumulate until one of
//! two asymmetric majorities is reached:
//! - **positive**: a strict majority of the *authorized* voter set says valid;
//! - **negative**: a strict majority of the votes *received so far* says
//!   invalid — rejection does not wait for full participation.
//!
//! ## Module overview
//!
//! - [`record`] — Per-transaction vote record: merge rules and the two
//!   majority evaluations.
//! - [`vote`] — Vote message and submission outcomes.
//! - [`live_set`] — Replace-only snapshot of currently reachable validators.
//! - [`result`] — The finalized consensus result.
//!
//! This crate is pure state and arithmetic: no IO, no clocks, no locks.
//! Scheduling and mutual exclusion live in `cord-node`.

pub mod live_set;
pub mod record;
pub mod result;
pub mod vote;

pub use live_set::LiveSet;
pub use record::{MajorityOutcome, VoteRecord};
pub use result::ConsensusResult;
pub use vote::{SubmitOutcome, Vote};
