//! Per-transaction vote record — merge rules and majority evaluation.
//!
//! A record is created when voting opens, with the then-current live
//! validator set frozen in as the authorized voters. From that point the
//! set never changes: membership churn cannot retroactively authorize or
//! de-authorize a vote. Votes merge in with first-vote-wins semantics and
//! the record is evaluated against two deliberately different thresholds
//! (see [`VoteRecord::evaluate`]).

use crate::vote::Vote;
use cord_types::{NodeId, Timestamp, TxHash};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Result of evaluating a record's accumulated votes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MajorityOutcome {
    /// A strict majority of the authorized voter set voted valid.
    Valid,
    /// A strict majority of the votes received so far voted invalid.
    Invalid,
    /// Neither threshold reached; keep the record open.
    Undecided,
}

/// The durable vote state for one transaction.
///
/// Invariant: `votes.keys() ⊆ authorized_voters`. Only
/// [`record_vote`](Self::record_vote) mutates `votes`, and it enforces both
/// the authorization check and first-vote-wins.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteRecord {
    /// The transaction under vote.
    pub tx_hash: TxHash,
    /// Validators allowed to vote, frozen at record creation.
    authorized_voters: HashSet<NodeId>,
    /// One vote per validator; a validator's first vote is final.
    votes: HashMap<NodeId, Vote>,
    /// When voting opened.
    pub created_at: Timestamp,
}

impl VoteRecord {
    /// Open a record with the given authorized voter snapshot.
    pub fn new(
        tx_hash: TxHash,
        authorized_voters: HashSet<NodeId>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            tx_hash,
            authorized_voters,
            votes: HashMap::new(),
            created_at,
        }
    }

    /// Whether a validator may vote on this transaction.
    pub fn is_authorized(&self, voter: &NodeId) -> bool {
        self.authorized_voters.contains(voter)
    }

    /// Merge one vote into the record.
    ///
    /// Returns `true` if the vote was recorded. A duplicate vote — even a
    /// conflicting one — is discarded, not an error: the first vote
    /// received stands. An unauthorized vote is likewise discarded here as
    /// a last line of defense; intake rejects it before it gets this far.
    pub fn record_vote(&mut self, vote: Vote) -> bool {
        if !self.authorized_voters.contains(&vote.voter) {
            return false;
        }
        if self.votes.contains_key(&vote.voter) {
            return false;
        }
        self.votes.insert(vote.voter, vote);
        true
    }

    /// Evaluate the two majority rules.
    ///
    /// - Positive consensus needs a strict majority of the *authorized*
    ///   set: `valid_count > authorized_count / 2`. A transaction cannot
    ///   pass just because few validators bothered to vote.
    /// - Negative consensus needs a strict majority of the votes
    ///   *received so far*: `invalid_count > received_count / 2`. Invalid
    ///   transactions are pruned eagerly, without waiting for quorum
    ///   participation.
    ///
    /// The denominators differ on purpose; both checks use integer
    /// division, so "strict majority of N" means at least `N / 2 + 1`.
    pub fn evaluate(&self) -> MajorityOutcome {
        let valid_count = self.votes.values().filter(|v| v.is_valid).count();
        if valid_count > self.authorized_voters.len() / 2 {
            return MajorityOutcome::Valid;
        }

        let invalid_count = self.votes.len() - valid_count;
        if invalid_count > self.votes.len() / 2 {
            return MajorityOutcome::Invalid;
        }

        MajorityOutcome::Undecided
    }

    /// Number of authorized voters (the positive-majority denominator).
    pub fn authorized_count(&self) -> usize {
        self.authorized_voters.len()
    }

    /// Number of votes received so far (the negative-majority denominator).
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    /// The recorded vote of a single validator, if any.
    pub fn vote_of(&self, voter: &NodeId) -> Option<&Vote> {
        self.votes.get(voter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(n: u8) -> TxHash {
        TxHash::new([n; 32])
    }

    fn voter(n: u8) -> NodeId {
        NodeId::new([n; 32])
    }

    fn record_with_voters(count: u8) -> VoteRecord {
        let voters = (1..=count).map(voter).collect();
        VoteRecord::new(tx(0xAA), voters, Timestamp::new(1000))
    }

    fn vote(record: &mut VoteRecord, n: u8, is_valid: bool) -> bool {
        record.record_vote(Vote::new(record.tx_hash, voter(n), is_valid))
    }

    #[test]
    fn new_record_is_undecided() {
        let record = record_with_voters(5);
        assert_eq!(record.authorized_count(), 5);
        assert_eq!(record.vote_count(), 0);
        assert_eq!(record.evaluate(), MajorityOutcome::Undecided);
    }

    #[test]
    fn positive_majority_needs_strict_majority_of_authorized() {
        let mut record = record_with_voters(5);
        vote(&mut record, 1, true);
        vote(&mut record, 2, true);
        // 2 of 5 is not > 5/2
        assert_eq!(record.evaluate(), MajorityOutcome::Undecided);

        vote(&mut record, 3, true);
        // 3 of 5 is > 5/2
        assert_eq!(record.evaluate(), MajorityOutcome::Valid);
    }

    #[test]
    fn positive_majority_counts_authorized_not_received() {
        // 2 valid votes of 2 received is unanimous, but the denominator is
        // the authorized set of 5 — still undecided.
        let mut record = record_with_voters(5);
        vote(&mut record, 1, true);
        vote(&mut record, 2, true);
        assert_eq!(record.evaluate(), MajorityOutcome::Undecided);
    }

    #[test]
    fn negative_majority_counts_received_votes() {
        // Asymmetric rejection: authorized set of 5, 3 votes received,
        // 2 invalid. 2 > 3/2 fires negative consensus even though positive
        // quorum (3 of 5) was never in reach.
        let mut record = record_with_voters(5);
        vote(&mut record, 1, false);
        vote(&mut record, 2, false);
        vote(&mut record, 3, true);
        assert_eq!(record.evaluate(), MajorityOutcome::Invalid);
    }

    #[test]
    fn single_invalid_vote_rejects_eagerly() {
        // 1 invalid of 1 received: 1 > 1/2. This is the eager-rejection
        // behavior the asymmetric denominator buys.
        let mut record = record_with_voters(5);
        vote(&mut record, 1, false);
        assert_eq!(record.evaluate(), MajorityOutcome::Invalid);
    }

    #[test]
    fn split_votes_stay_undecided() {
        let mut record = record_with_voters(4);
        vote(&mut record, 1, true);
        vote(&mut record, 2, false);
        // 1 valid of 4 authorized: no. 1 invalid of 2 received: 1 > 1, no.
        assert_eq!(record.evaluate(), MajorityOutcome::Undecided);
    }

    #[test]
    fn duplicate_vote_is_discarded() {
        let mut record = record_with_voters(3);
        assert!(vote(&mut record, 1, true));
        assert!(!vote(&mut record, 1, true));
        assert_eq!(record.vote_count(), 1);
    }

    #[test]
    fn conflicting_second_vote_does_not_overwrite() {
        let mut record = record_with_voters(3);
        assert!(vote(&mut record, 1, true));
        assert!(!vote(&mut record, 1, false));

        let recorded = record.vote_of(&voter(1)).unwrap();
        assert!(recorded.is_valid);
        assert_eq!(record.vote_count(), 1);
    }

    #[test]
    fn unauthorized_vote_is_discarded() {
        let mut record = record_with_voters(3);
        assert!(!vote(&mut record, 99, true));
        assert_eq!(record.vote_count(), 0);
        assert!(!record.is_authorized(&voter(99)));
    }

    #[test]
    fn empty_authorized_set_never_reaches_positive() {
        // A record opened during a total membership outage: nobody is
        // authorized, so no vote can be recorded and 0 > 0/2 never holds.
        let mut record = record_with_voters(0);
        assert!(!vote(&mut record, 1, true));
        assert_eq!(record.evaluate(), MajorityOutcome::Undecided);
    }

    #[test]
    fn even_authorized_set_majority_boundary() {
        let mut record = record_with_voters(4);
        vote(&mut record, 1, true);
        vote(&mut record, 2, true);
        // 2 of 4 is not > 4/2
        assert_eq!(record.evaluate(), MajorityOutcome::Undecided);

        vote(&mut record, 3, true);
        assert_eq!(record.evaluate(), MajorityOutcome::Valid);
    }

    #[test]
    fn positive_checked_before_negative() {
        // 3 valid + 2 invalid of 5: both counts exist, positive wins
        // because it is evaluated first and reached its threshold.
        let mut record = record_with_voters(5);
        for n in 1..=3 {
            vote(&mut record, n, true);
        }
        vote(&mut record, 4, false);
        vote(&mut record, 5, false);
        assert_eq!(record.evaluate(), MajorityOutcome::Valid);
    }

    #[test]
    fn serde_round_trip_preserves_votes() {
        let mut record = record_with_voters(3);
        vote(&mut record, 1, true);
        vote(&mut record, 2, false);

        let bytes = bincode::serialize(&record).unwrap();
        let back: VoteRecord = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back.tx_hash, record.tx_hash);
        assert_eq!(back.authorized_count(), 3);
        assert_eq!(back.vote_count(), 2);
        assert_eq!(back.evaluate(), record.evaluate());
    }
}
