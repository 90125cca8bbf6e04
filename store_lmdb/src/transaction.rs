//! LMDB implementation of TransactionStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use cord_store::transaction::TransactionStore;
use cord_store::StoreError;
use cord_types::TxHash;

use crate::LmdbError;

pub struct LmdbTransactionStore {
    pub(crate) env: Arc<Env>,
    pub(crate) transactions_db: Database<Bytes, Bytes>,
}

impl TransactionStore for LmdbTransactionStore {
    fn put_transaction(&self, hash: &TxHash, tx_bytes: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.transactions_db
            .put(&mut wtxn, hash.as_bytes(), tx_bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_transaction(&self, hash: &TxHash) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .transactions_db
            .get(&rtxn, hash.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(val.map(|v| v.to_vec()))
    }

    fn exists(&self, hash: &TxHash) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .transactions_db
            .get(&rtxn, hash.as_bytes())
            .map_err(LmdbError::from)?
            .is_some();
        Ok(found)
    }

    fn delete_transaction(&self, hash: &TxHash) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.transactions_db
            .delete(&mut wtxn, hash.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
