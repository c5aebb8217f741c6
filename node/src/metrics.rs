//! Prometheus metrics for payment voting.
//!
//! [`PaymentMetrics`] owns a dedicated [`Registry`]; [`PaymentMetrics::encode`]
//! renders it in the text exposition format for whatever endpoint the host
//! serves.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

pub struct PaymentMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Payment votes received from peers.
    pub votes_received: IntCounter,
    /// Votes recorded into the ledger, own votes included.
    pub votes_recorded: IntCounter,
    /// Rejected votes, labelled by reason code.
    pub votes_rejected: IntCounterVec,
    pub self_votes_cast: IntCounter,
    pub sync_requests_served: IntCounter,
    pub snapshot_writes: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub vote_count: IntGauge,
    /// Heights with at least one vote.
    pub block_count: IntGauge,
}

impl PaymentMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let votes_received = register_int_counter_with_registry!(
            Opts::new(
                "patriot_payment_votes_received_total",
                "Payment votes received from peers"
            ),
            registry
        )?;
        let votes_recorded = register_int_counter_with_registry!(
            Opts::new(
                "patriot_payment_votes_recorded_total",
                "Payment votes recorded into the ledger"
            ),
            registry
        )?;
        let votes_rejected = register_int_counter_vec_with_registry!(
            Opts::new(
                "patriot_payment_votes_rejected_total",
                "Payment votes rejected, by reason"
            ),
            &["reason"],
            registry
        )?;
        let self_votes_cast = register_int_counter_with_registry!(
            Opts::new(
                "patriot_payment_self_votes_total",
                "Payment votes cast by this node"
            ),
            registry
        )?;
        let sync_requests_served = register_int_counter_with_registry!(
            Opts::new(
                "patriot_payment_sync_requests_total",
                "Payment vote sync requests answered"
            ),
            registry
        )?;
        let snapshot_writes = register_int_counter_with_registry!(
            Opts::new(
                "patriot_payment_snapshot_writes_total",
                "Payment vote snapshots written to disk"
            ),
            registry
        )?;

        let vote_count = register_int_gauge_with_registry!(
            Opts::new("patriot_payment_vote_count", "Payment votes in the ledger"),
            registry
        )?;
        let block_count = register_int_gauge_with_registry!(
            Opts::new(
                "patriot_payment_block_count",
                "Block heights with payment votes"
            ),
            registry
        )?;

        Ok(Self {
            registry,
            votes_received,
            votes_recorded,
            votes_rejected,
            self_votes_cast,
            sync_requests_served,
            snapshot_writes,
            vote_count,
            block_count,
        })
    }

    pub fn record_rejection(&self, reason: &str) {
        self.votes_rejected.with_label_values(&[reason]).inc();
    }

    pub fn set_ledger_size(&self, votes: usize, blocks: usize) {
        self.vote_count.set(votes as i64);
        self.block_count.set(blocks as i64);
    }

    /// Text exposition of every registered metric.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_labelled() {
        let metrics = PaymentMetrics::new().unwrap();
        metrics.record_rejection("bad-signature");
        metrics.record_rejection("bad-signature");
        metrics.record_rejection("out-of-range");
        assert_eq!(
            metrics
                .votes_rejected
                .with_label_values(&["bad-signature"])
                .get(),
            2
        );
        let text = metrics.encode().unwrap();
        assert!(text.contains("patriot_payment_votes_rejected_total"));
        assert!(text.contains("reason=\"out-of-range\""));
    }

    #[test]
    fn ledger_size_gauges() {
        let metrics = PaymentMetrics::new().unwrap();
        metrics.set_ledger_size(12, 3);
        assert_eq!(metrics.vote_count.get(), 12);
        assert_eq!(metrics.block_count.get(), 3);
    }
}
