use cord_types::TxHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("store error: {0}")]
    Store(#[from] cord_store::StoreError),

    #[error("store backend error: {0}")]
    Lmdb(#[from] cord_store_lmdb::LmdbError),

    #[error("network error: {0}")]
    Network(#[from] cord_network::NetworkError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("decided transaction {0} is missing from the transaction store")]
    MissingTransaction(TxHash),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for NodeError {
    fn from(e: bincode::Error) -> Self {
        NodeError::Serialization(e.to_string())
    }
}
