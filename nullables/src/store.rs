//! Nullable store — thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use cord_store::{MetaStore, StoreError, TransactionStore, VoteRecordStore};
use cord_types::TxHash;

/// An in-memory implementation of every storage trait.
///
/// Thread-safe for use with tokio's multi-threaded runtime. Writes can be
/// made to fail on demand so tests can exercise the fatal-error paths of
/// the decision publisher and sweep.
pub struct NullStore {
    vote_records: Mutex<HashMap<[u8; 32], Vec<u8>>>,
    transactions: Mutex<HashMap<[u8; 32], Vec<u8>>>,
    meta: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            vote_records: Mutex::new(HashMap::new()),
            transactions: Mutex::new(HashMap::new()),
            meta: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write fail with a backend error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            Err(StoreError::Backend("simulated write failure".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VoteRecordStore for NullStore {
    fn put_record(&self, hash: &TxHash, record_bytes: &[u8]) -> Result<(), StoreError> {
        self.check_write()?;
        self.vote_records
            .lock()
            .unwrap()
            .insert(*hash.as_bytes(), record_bytes.to_vec());
        Ok(())
    }

    fn get_record(&self, hash: &TxHash) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .vote_records
            .lock()
            .unwrap()
            .get(hash.as_bytes())
            .cloned())
    }

    fn delete_record(&self, hash: &TxHash) -> Result<(), StoreError> {
        self.check_write()?;
        self.vote_records.lock().unwrap().remove(hash.as_bytes());
        Ok(())
    }

    fn iter_records(&self) -> Result<Vec<(TxHash, Vec<u8>)>, StoreError> {
        Ok(self
            .vote_records
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (TxHash::new(*k), v.clone()))
            .collect())
    }
}

impl TransactionStore for NullStore {
    fn put_transaction(&self, hash: &TxHash, tx_bytes: &[u8]) -> Result<(), StoreError> {
        self.check_write()?;
        self.transactions
            .lock()
            .unwrap()
            .insert(*hash.as_bytes(), tx_bytes.to_vec());
        Ok(())
    }

    fn get_transaction(&self, hash: &TxHash) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .get(hash.as_bytes())
            .cloned())
    }

    fn exists(&self, hash: &TxHash) -> Result<bool, StoreError> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .contains_key(hash.as_bytes()))
    }

    fn delete_transaction(&self, hash: &TxHash) -> Result<(), StoreError> {
        self.check_write()?;
        self.transactions.lock().unwrap().remove(hash.as_bytes());
        Ok(())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.check_write()?;
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        self.check_write()?;
        self.meta.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(n: u8) -> TxHash {
        TxHash::new([n; 32])
    }

    #[test]
    fn record_round_trip() {
        let store = NullStore::new();
        store.put_record(&hash(1), b"record").unwrap();
        assert_eq!(
            store.get_record(&hash(1)).unwrap().as_deref(),
            Some(b"record".as_ref())
        );
        store.delete_record(&hash(1)).unwrap();
        assert!(store.get_record(&hash(1)).unwrap().is_none());
    }

    #[test]
    fn transaction_round_trip() {
        let store = NullStore::new();
        assert!(!store.exists(&hash(2)).unwrap());
        store.put_transaction(&hash(2), b"tx").unwrap();
        assert!(store.exists(&hash(2)).unwrap());
    }

    #[test]
    fn meta_round_trip() {
        let store = NullStore::new();
        store.put_meta("key", b"value").unwrap();
        assert_eq!(
            store.get_meta("key").unwrap().as_deref(),
            Some(b"value".as_ref())
        );
    }

    #[test]
    fn simulated_write_failure() {
        let store = NullStore::new();
        store.fail_writes(true);
        assert!(store.put_record(&hash(3), b"x").is_err());
        assert!(store.put_meta("k", b"v").is_err());

        store.fail_writes(false);
        assert!(store.put_record(&hash(3), b"x").is_ok());
    }

    #[test]
    fn iter_records_returns_everything() {
        let store = NullStore::new();
        store.put_record(&hash(1), b"a").unwrap();
        store.put_record(&hash(2), b"b").unwrap();
        assert_eq!(store.iter_records().unwrap().len(), 2);
    }
}
