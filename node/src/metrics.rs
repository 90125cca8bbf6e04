//! Prometheus metrics for the CORD node.
//!
//! Exposes counters, gauges, and a histogram covering vote intake,
//! membership probing, and consensus sweep activity.  The [`NodeMetrics`]
//! struct owns a dedicated [`Registry`] that a metrics endpoint can encode
//! into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Histogram, HistogramOpts, IntCounter, IntGauge, Opts,
    Registry,
};

/// Central collection of all node-level Prometheus metrics.
pub struct NodeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Total number of votes submitted to this node.
    pub votes_received: IntCounter,
    /// Total number of votes accepted into a pending buffer.
    pub votes_accepted: IntCounter,
    /// Total number of votes rejected because the voter was not authorized.
    pub votes_unauthorized: IntCounter,
    /// Total number of consensus results published.
    pub decisions_published: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Current number of transactions open for voting.
    pub open_votes: IntGauge,
    /// Validators reachable as of the last membership probe.
    pub live_validators: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Duration of one consensus sweep pass, in milliseconds.
    pub sweep_duration_ms: Histogram,
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        // Counters
        let votes_received = register_int_counter_with_registry!(
            Opts::new("cord_votes_received_total", "Total votes submitted"),
            registry
        )
        .expect("failed to register votes_received counter");

        let votes_accepted = register_int_counter_with_registry!(
            Opts::new(
                "cord_votes_accepted_total",
                "Total votes accepted into pending buffers"
            ),
            registry
        )
        .expect("failed to register votes_accepted counter");

        let votes_unauthorized = register_int_counter_with_registry!(
            Opts::new(
                "cord_votes_unauthorized_total",
                "Total votes rejected as unauthorized"
            ),
            registry
        )
        .expect("failed to register votes_unauthorized counter");

        let decisions_published = register_int_counter_with_registry!(
            Opts::new(
                "cord_decisions_published_total",
                "Total consensus results published"
            ),
            registry
        )
        .expect("failed to register decisions_published counter");

        // Gauges
        let open_votes = register_int_gauge_with_registry!(
            Opts::new("cord_open_votes", "Transactions currently open for voting"),
            registry
        )
        .expect("failed to register open_votes gauge");

        let live_validators = register_int_gauge_with_registry!(
            Opts::new(
                "cord_live_validators",
                "Validators reachable at the last probe"
            ),
            registry
        )
        .expect("failed to register live_validators gauge");

        // Histogram – exponential buckets covering 1 ms → ~16 s.
        let sweep_duration_ms = register_histogram_with_registry!(
            HistogramOpts::new("cord_sweep_duration_ms", "Sweep pass duration in milliseconds")
                .buckets(prometheus::exponential_buckets(1.0, 2.0, 15).unwrap()),
            registry
        )
        .expect("failed to register sweep_duration_ms histogram");

        Self {
            registry,
            votes_received,
            votes_accepted,
            votes_unauthorized,
            decisions_published,
            open_votes,
            live_validators,
            sweep_duration_ms,
        }
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero_and_increment() {
        let metrics = NodeMetrics::new();
        assert_eq!(metrics.votes_received.get(), 0);
        metrics.votes_received.inc();
        assert_eq!(metrics.votes_received.get(), 1);
    }

    #[test]
    fn registry_gathers_all_metric_families() {
        let metrics = NodeMetrics::new();
        let families = metrics.registry.gather();
        assert!(families.len() >= 7);
    }
}
