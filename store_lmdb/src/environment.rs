//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::error::LmdbError;
use crate::meta::LmdbMetaStore;
use crate::transaction::LmdbTransactionStore;
use crate::vote_record::LmdbVoteRecordStore;

const VOTE_RECORDS_DB: &str = "vote_records";
const TRANSACTIONS_DB: &str = "transactions";
const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
///
/// One environment per data directory; every store handed out by the
/// accessor methods shares it, so cross-store reads see a consistent view
/// within a single LMDB transaction.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    vote_records_db: Database<Bytes, Bytes>,
    transactions_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Heed(format!("create data dir: {e}")))?;

        // SAFETY: the environment is opened once per process per path; heed
        // marks `open` unsafe because two environments on the same path can
        // corrupt each other.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let vote_records_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(VOTE_RECORDS_DB))?;
        let transactions_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(TRANSACTIONS_DB))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            vote_records_db,
            transactions_db,
            meta_db,
        })
    }

    pub fn vote_record_store(&self) -> LmdbVoteRecordStore {
        LmdbVoteRecordStore {
            env: Arc::clone(&self.env),
            vote_records_db: self.vote_records_db,
        }
    }

    pub fn transaction_store(&self) -> LmdbTransactionStore {
        LmdbTransactionStore {
            env: Arc::clone(&self.env),
            transactions_db: self.transactions_db,
        }
    }

    pub fn meta_store(&self) -> LmdbMetaStore {
        LmdbMetaStore {
            env: Arc::clone(&self.env),
            meta_db: self.meta_db,
        }
    }
}
