//! Voting registry — per-transaction pending buffers behind fine-grained locks.
//!
//! Every transaction open for voting owns one entry: a pending vote buffer
//! guarded by its own async mutex. That mutex is the exclusive section
//! shared by vote intake (appends) and the consensus sweep (drain, merge,
//! decide), so no interleaving can lose an appended vote or merge one
//! twice. The registry map itself is only locked long enough to insert,
//! remove, or clone an entry handle — intake and sweeps for distinct
//! transactions never serialize behind each other.
//!
//! Locks are keyed by the [`TxHash`] value itself, never a derived string.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use cord_consensus::Vote;
use cord_types::TxHash;

/// The per-transaction state guarded by the entry mutex.
#[derive(Debug, Default)]
pub struct TxVoting {
    /// Votes received since the last sweep pass, in arrival order.
    pub pending: Vec<Vote>,
    /// Set by the sweep, under the lock, at the moment of decision.
    /// An intake call that raced the decision observes this and reports
    /// `AlreadyDecided` instead of appending to a dead buffer.
    pub retired: bool,
}

/// Registry of transactions currently open for voting.
pub struct VotingRegistry {
    entries: RwLock<HashMap<TxHash, Arc<Mutex<TxVoting>>>>,
}

impl VotingRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Open an entry for a transaction.
    ///
    /// Returns `false` if one is already open — opening is idempotent and
    /// never resets an in-progress buffer.
    pub fn open(&self, hash: TxHash) -> bool {
        let mut entries = self.entries.write().expect("registry lock poisoned");
        if entries.contains_key(&hash) {
            return false;
        }
        entries.insert(hash, Arc::new(Mutex::new(TxVoting::default())));
        true
    }

    /// Get a handle to a transaction's entry, if it is still open.
    pub fn entry(&self, hash: &TxHash) -> Option<Arc<Mutex<TxVoting>>> {
        self.entries
            .read()
            .expect("registry lock poisoned")
            .get(hash)
            .cloned()
    }

    /// Remove a transaction's entry after its decision.
    ///
    /// The caller must already have marked the entry retired under its
    /// lock; removal here only makes the retirement visible to lookups.
    pub fn remove(&self, hash: &TxHash) -> Option<Arc<Mutex<TxVoting>>> {
        self.entries
            .write()
            .expect("registry lock poisoned")
            .remove(hash)
    }

    /// Hashes of all transactions currently open, for the sweep to walk.
    pub fn open_hashes(&self) -> Vec<TxHash> {
        self.entries
            .read()
            .expect("registry lock poisoned")
            .keys()
            .copied()
            .collect()
    }

    /// Number of transactions currently open for voting.
    pub fn len(&self) -> usize {
        self.entries.read().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VotingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
