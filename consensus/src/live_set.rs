//! Live validator set — the membership snapshot source.

use cord_types::NodeId;
use std::collections::HashSet;

/// The set of validator identities believed reachable as of the last probe
/// cycle.
///
/// Replace-only: each refresh swaps in a whole new set via
/// [`replace`](Self::replace), never mutates the existing one. Readers that
/// need a stable view take a [`snapshot`](Self::snapshot); the snapshot a
/// vote record freezes in at open time is what authorization is checked
/// against for the life of that record.
#[derive(Clone, Debug, Default)]
pub struct LiveSet {
    validators: HashSet<NodeId>,
}

impl LiveSet {
    pub fn new() -> Self {
        Self {
            validators: HashSet::new(),
        }
    }

    /// Atomically replace the whole set with this cycle's probe results.
    pub fn replace(&mut self, validators: HashSet<NodeId>) {
        self.validators = validators;
    }

    /// Clone the current membership for snapshotting into a vote record.
    pub fn snapshot(&self) -> HashSet<NodeId> {
        self.validators.clone()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.validators.contains(id)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> NodeId {
        NodeId::new([n; 32])
    }

    #[test]
    fn new_set_is_empty() {
        let set = LiveSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn replace_swaps_whole_set() {
        let mut set = LiveSet::new();
        set.replace([id(1), id(2)].into_iter().collect());
        assert_eq!(set.len(), 2);
        assert!(set.contains(&id(1)));

        set.replace([id(3)].into_iter().collect());
        assert_eq!(set.len(), 1);
        assert!(!set.contains(&id(1)));
        assert!(set.contains(&id(3)));
    }

    #[test]
    fn replace_with_empty_is_allowed() {
        // Total outage: the empty result still becomes the live set.
        let mut set = LiveSet::new();
        set.replace([id(1)].into_iter().collect());
        set.replace(HashSet::new());
        assert!(set.is_empty());
    }

    #[test]
    fn snapshot_is_independent_of_later_replaces() {
        let mut set = LiveSet::new();
        set.replace([id(1), id(2)].into_iter().collect());
        let snap = set.snapshot();

        set.replace([id(9)].into_iter().collect());
        assert!(snap.contains(&id(1)));
        assert!(!snap.contains(&id(9)));
    }
}
