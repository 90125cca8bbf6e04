//! LMDB implementation of VoteRecordStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use cord_store::vote_record::VoteRecordStore;
use cord_store::StoreError;
use cord_types::TxHash;

use crate::LmdbError;

pub struct LmdbVoteRecordStore {
    pub(crate) env: Arc<Env>,
    pub(crate) vote_records_db: Database<Bytes, Bytes>,
}

impl VoteRecordStore for LmdbVoteRecordStore {
    fn put_record(&self, hash: &TxHash, record_bytes: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.vote_records_db
            .put(&mut wtxn, hash.as_bytes(), record_bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_record(&self, hash: &TxHash) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .vote_records_db
            .get(&rtxn, hash.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(val.map(|v| v.to_vec()))
    }

    fn delete_record(&self, hash: &TxHash) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.vote_records_db
            .delete(&mut wtxn, hash.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_records(&self) -> Result<Vec<(TxHash, Vec<u8>)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self
            .vote_records_db
            .iter(&rtxn)
            .map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            if key.len() != 32 {
                continue;
            }
            let mut buf = [0u8; 32];
            buf.copy_from_slice(key);
            results.push((TxHash::new(buf), val.to_vec()));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_env() -> (tempfile::TempDir, crate::LmdbEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        let env = crate::LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
        (dir, env)
    }

    fn hash(n: u8) -> TxHash {
        TxHash::new([n; 32])
    }

    #[test]
    fn put_and_get_record() {
        let (_dir, env) = open_test_env();
        let store = env.vote_record_store();

        assert!(store.get_record(&hash(1)).unwrap().is_none());

        store.put_record(&hash(1), b"record-bytes").unwrap();
        assert_eq!(
            store.get_record(&hash(1)).unwrap().as_deref(),
            Some(b"record-bytes".as_ref())
        );
    }

    #[test]
    fn put_overwrites_existing() {
        let (_dir, env) = open_test_env();
        let store = env.vote_record_store();

        store.put_record(&hash(2), b"v1").unwrap();
        store.put_record(&hash(2), b"v2").unwrap();
        assert_eq!(
            store.get_record(&hash(2)).unwrap().as_deref(),
            Some(b"v2".as_ref())
        );
    }

    #[test]
    fn delete_record_removes() {
        let (_dir, env) = open_test_env();
        let store = env.vote_record_store();

        store.put_record(&hash(3), b"gone soon").unwrap();
        store.delete_record(&hash(3)).unwrap();
        assert!(store.get_record(&hash(3)).unwrap().is_none());
    }

    #[test]
    fn iter_records_returns_all() {
        let (_dir, env) = open_test_env();
        let store = env.vote_record_store();

        store.put_record(&hash(1), b"a").unwrap();
        store.put_record(&hash(2), b"b").unwrap();
        store.put_record(&hash(3), b"c").unwrap();

        let all = store.iter_records().unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().any(|(h, v)| *h == hash(2) && v == b"b"));
    }
}
