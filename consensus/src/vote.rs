//! Vote message and submission outcomes.

use cord_types::{NodeId, TxHash};
use serde::{Deserialize, Serialize};

/// A single validator's verdict on one transaction.
///
/// Transient: consumed into the transaction's [`VoteRecord`](crate::VoteRecord)
/// by the sweep and then discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// The transaction being voted on.
    pub tx_hash: TxHash,
    /// The validator casting the vote.
    pub voter: NodeId,
    /// The verdict: does this validator consider the transaction valid?
    pub is_valid: bool,
}

impl Vote {
    pub fn new(tx_hash: TxHash, voter: NodeId, is_valid: bool) -> Self {
        Self {
            tx_hash,
            voter,
            is_valid,
        }
    }
}

/// Outcome of submitting a vote, reported back to the caller.
///
/// Every rejection is distinguishable so operators can tell a
/// misconfigured peer (`UnauthorizedVoter`) from a slow one
/// (`UnknownTransaction`) from one that is merely late (`AlreadyDecided`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The vote was appended to the transaction's pending buffer.
    Accepted,
    /// No vote record exists for the transaction, even after the grace
    /// retry.
    UnknownTransaction,
    /// The voter is not in the transaction's authorized voter set.
    UnauthorizedVoter,
    /// Consensus already finalized this transaction; no further votes are
    /// accepted.
    AlreadyDecided,
}
