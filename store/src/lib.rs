//! Abstract storage traits for the CORD protocol.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits; values are
//! serialized bytes, so backends stay schema-agnostic.

pub mod error;
pub mod meta;
pub mod transaction;
pub mod vote_record;

pub use error::StoreError;
pub use meta::MetaStore;
pub use transaction::TransactionStore;
pub use vote_record::VoteRecordStore;
