//! Validator node identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte validator identity.
///
/// This is the hash a validator answers with on its identity endpoint and
/// the key under which its votes are recorded. Two validators never share
/// an identity; a validator keeps its identity across restarts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId([u8; 32]);

impl NodeId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse an identity from its 64-character hex form.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let id = NodeId::new([0x5A; 32]);
        let hex = id.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(NodeId::from_hex(&hex), Some(id));
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert_eq!(NodeId::from_hex("zz"), None);
        assert_eq!(NodeId::from_hex("abcd"), None); // too short
        assert_eq!(NodeId::from_hex(&"ab".repeat(33)), None); // too long
    }

    #[test]
    fn debug_form_is_short() {
        let id = NodeId::new([0xAB; 32]);
        assert_eq!(format!("{id:?}"), "NodeId(abababab)");
    }
}
