//! LMDB storage backend for the CORD protocol.
//!
//! Implements the storage traits from `cord-store` using the `heed` LMDB
//! bindings. Each logical store maps to one named LMDB database within a
//! single environment.

pub mod environment;
pub mod error;
pub mod meta;
pub mod transaction;
pub mod vote_record;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use meta::LmdbMetaStore;
pub use transaction::LmdbTransactionStore;
pub use vote_record::LmdbVoteRecordStore;
