//! Membership probe — discovers which configured validators are reachable.
//!
//! Process:
//! 1. Periodically send `GET /identity` to every configured validator address
//! 2. Collect the identities that answered within the timeout
//! 3. Atomically replace the shared live set with the result
//!
//! A validator that does not answer is simply absent from this cycle's set;
//! it re-enters on the next cycle it answers. The probe never blocks on one
//! slow address: every query runs concurrently with its own timeout.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::RwLock;

use cord_consensus::LiveSet;
use cord_types::NodeId;

use crate::error::NetworkError;

/// Default timeout for a single identity query.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Raw JSON response from a validator's identity endpoint.
///
/// The API contract: `GET {base}/identity` returns
/// `{"node_id": "<64 hex chars>"}`.
#[derive(Debug, Deserialize)]
struct IdentityResponse {
    node_id: String,
}

/// Probes configured validator addresses and maintains the live set.
///
/// The address list is fixed at construction (membership configuration is
/// loaded once at startup); only reachability varies between cycles.
pub struct MembershipProbe {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    /// Configured validator base URLs, in configuration order.
    validators: Vec<String>,
    /// The shared live set this probe owns the writes to.
    live_set: Arc<RwLock<LiveSet>>,
}

impl MembershipProbe {
    /// Create a probe over the configured validator addresses.
    pub fn new(validators: Vec<String>, live_set: Arc<RwLock<LiveSet>>) -> Self {
        Self::with_timeout(validators, live_set, DEFAULT_TIMEOUT)
    }

    /// Create a probe with a custom per-request timeout.
    pub fn with_timeout(
        validators: Vec<String>,
        live_set: Arc<RwLock<LiveSet>>,
        timeout: Duration,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            validators,
            live_set,
        }
    }

    /// Run one probe cycle: query every address, replace the live set.
    ///
    /// Returns the number of validators reachable this cycle. Individual
    /// failures are logged and skipped; only the aggregate result matters.
    /// An empty result is logged as a warning but still replaces the set —
    /// a vote record opened during a total outage ships with an empty
    /// authorized set and can never reach positive consensus.
    pub async fn refresh(&self) -> usize {
        let mut handles = Vec::with_capacity(self.validators.len());

        for address in &self.validators {
            let client = self.http_client.clone();
            let address = address.clone();
            handles.push(tokio::spawn(async move {
                let result = query_identity(&client, &address).await;
                (address, result)
            }));
        }

        let mut online = HashSet::new();
        for handle in handles {
            match handle.await {
                Ok((_, Ok(id))) => {
                    online.insert(id);
                }
                Ok((address, Err(e))) => {
                    tracing::warn!(%address, error = %e, "validator did not answer identity probe");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "identity probe task failed");
                }
            }
        }

        if online.is_empty() {
            tracing::warn!("no validators reachable — live set is empty");
        }

        let count = online.len();
        self.live_set.write().await.replace(online);
        tracing::debug!(live = count, "membership refresh complete");
        count
    }

    /// Number of configured validator addresses.
    pub fn configured_count(&self) -> usize {
        self.validators.len()
    }
}

/// Query one validator's identity endpoint.
///
/// Extracted as a standalone function to avoid lifetime issues with
/// `tokio::spawn` and `&self`.
async fn query_identity(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<NodeId, NetworkError> {
    let url = format!("{}/identity", base_url.trim_end_matches('/'));

    let response = client.get(&url).send().await.map_err(|e| {
        if e.is_timeout() {
            NetworkError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            NetworkError::Unreachable(format!("connection failed: {e}"))
        } else {
            NetworkError::RequestFailed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(NetworkError::RequestFailed(format!(
            "HTTP status {}",
            response.status()
        )));
    }

    let identity: IdentityResponse = response.json().await.map_err(|e| {
        NetworkError::InvalidResponse(format!("failed to parse identity response: {e}"))
    })?;

    NodeId::from_hex(&identity.node_id).ok_or_else(|| {
        NetworkError::InvalidResponse(format!("malformed node_id: {}", identity.node_id))
    })
}
