//! Queue-based propagation of consensus results.
//!
//! The [`Broadcaster`] does not write directly to sockets. It pushes
//! topic-labelled payloads onto an `mpsc` channel that the connection
//! layer drains and floods to peers. From the consensus engine's
//! perspective propagation is fire-and-forget.

use tokio::sync::mpsc;

use cord_consensus::ConsensusResult;

use crate::error::NetworkError;

/// Topic label under which finalized consensus results are propagated.
pub const CONSENSUS_RESULT_TOPIC: &str = "consensus_result";

/// A payload queued for propagation, labelled with its topic so the
/// connection layer can route subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropagationMessage {
    pub topic: &'static str,
    pub payload: Vec<u8>,
}

/// Queue-based broadcaster.
///
/// Each call places one [`PropagationMessage`] onto the outbound channel.
/// The connection layer is responsible for actually writing to the wire.
#[derive(Clone)]
pub struct Broadcaster {
    outbound_tx: mpsc::Sender<PropagationMessage>,
}

impl Broadcaster {
    /// Create a new broadcaster backed by the given outbound channel.
    pub fn new(outbound_tx: mpsc::Sender<PropagationMessage>) -> Self {
        Self { outbound_tx }
    }

    /// Queue a serialized payload under a topic.
    ///
    /// A full channel drops the message (propagation is best-effort; peers
    /// re-sync decided transactions through the regular sync path). A
    /// closed channel is an error: the connection layer is gone.
    pub fn broadcast(&self, topic: &'static str, payload: Vec<u8>) -> Result<(), NetworkError> {
        match self.outbound_tx.try_send(PropagationMessage { topic, payload }) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(msg)) => {
                tracing::warn!(topic = msg.topic, "outbound channel full — dropping broadcast");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(NetworkError::ChannelClosed),
        }
    }

    /// Serialize and queue a consensus result under its topic.
    pub fn broadcast_result(&self, result: &ConsensusResult) -> Result<(), NetworkError> {
        let payload = bincode::serialize(result)
            .map_err(|e| NetworkError::Serialization(e.to_string()))?;
        self.broadcast(CONSENSUS_RESULT_TOPIC, payload)
    }
}
