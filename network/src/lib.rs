//! Networking for the CORD node.
//!
//! Two concerns live here:
//! - [`membership`] — probing configured validator addresses for their
//!   identity and maintaining the live validator set.
//! - [`broadcast`] — queue-based propagation of consensus results to the
//!   connection layer.
//!
//! Transport details (framing, authentication) are the connection layer's
//! problem; this crate only speaks HTTP for identity probes and hands
//! serialized payloads to an outbound channel.

pub mod broadcast;
pub mod error;
pub mod membership;

pub use broadcast::{Broadcaster, PropagationMessage, CONSENSUS_RESULT_TOPIC};
pub use error::NetworkError;
pub use membership::MembershipProbe;
