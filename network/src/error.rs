use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("HTTP request to validator endpoint failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from validator: {0}")]
    InvalidResponse(String),

    #[error("validator endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("outbound channel closed")]
    ChannelClosed,
}
