//! The payments service: one voting engine shared by block validation, vote
//! sync, and the snapshot store, plus the maintenance loop that keeps the
//! ledger trimmed and persisted.

use std::io::ErrorKind;
use std::sync::Arc;

use patriot_consensus::{
    BlockValidator, Collaborators, LedgerSnapshot, SelfVote, SporkView, VoteOutcome, VotingEngine,
};
use patriot_network::{Handled, PaymentSync, PeerInfo};
use patriot_store::{LoadError, PaymentsDb};
use patriot_types::BlockHeight;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant};
use tracing::{info, warn};

use crate::config::NodeConfig;
use crate::metrics::PaymentMetrics;
use crate::NodeError;

pub struct PaymentsService {
    config: NodeConfig,
    engine: Arc<VotingEngine>,
    validator: BlockValidator,
    sync: PaymentSync,
    store: Arc<PaymentsDb>,
    /// Present when `enable_metrics` is set.
    metrics: Option<PaymentMetrics>,
}

impl PaymentsService {
    pub fn new(
        config: NodeConfig,
        deps: Collaborators,
        sporks: Arc<dyn SporkView>,
    ) -> Result<Self, NodeError> {
        let mut engine = VotingEngine::new(config.payment_params(), deps.clone());
        if let Some(active) = config.active_node()? {
            info!(collateral = %active.collateral, "operating patriotnode");
            engine = engine.with_active_node(active);
        }
        let engine = Arc::new(engine);
        let metrics = if config.enable_metrics {
            Some(PaymentMetrics::new()?)
        } else {
            None
        };

        Ok(Self {
            validator: BlockValidator::new(engine.clone(), sporks, config.network),
            sync: PaymentSync::new(engine.clone(), deps.peers, config.network),
            store: Arc::new(PaymentsDb::new(config.payments_path(), config.network)),
            metrics,
            engine,
            config,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<VotingEngine> {
        &self.engine
    }

    pub fn validator(&self) -> &BlockValidator {
        &self.validator
    }

    pub fn sync(&self) -> &PaymentSync {
        &self.sync
    }

    pub fn metrics(&self) -> Option<&PaymentMetrics> {
        self.metrics.as_ref()
    }

    // ── Persistence ──────────────────────────────────────────────────────

    /// Restore the ledger from disk. Returns the number of votes loaded.
    ///
    /// On any failure the ledger stays empty; a payload that would not decode
    /// also clears whatever was there before.
    pub fn load(&self) -> Result<usize, LoadError> {
        match self.store.read::<LedgerSnapshot>() {
            Ok(snapshot) => {
                self.engine.restore(snapshot);
                self.refresh_gauges();
                info!(summary = %self.engine.summary(), "payment votes restored");
                Ok(self.engine.vote_count())
            }
            Err(err) => {
                if err.is_format() {
                    warn!(code = err.code(), "payment votes file unreadable, clearing");
                    self.engine.clear();
                }
                Err(err)
            }
        }
    }

    /// Write the ledger to disk on the blocking pool.
    pub async fn dump(&self) -> Result<(), NodeError> {
        let snapshot = self.engine.snapshot();
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.write(&snapshot)).await??;
        if let Some(metrics) = &self.metrics {
            metrics.snapshot_writes.inc();
        }
        info!(summary = %self.engine.summary(), "payment votes written");
        Ok(())
    }

    // ── Events ───────────────────────────────────────────────────────────

    /// Handle one payment message frame from `peer`.
    pub fn handle_message(&self, peer: &PeerInfo, bytes: &[u8]) -> Result<Handled, NodeError> {
        let handled = self.sync.handle_bytes(peer, bytes)?;
        let Some(metrics) = &self.metrics else {
            return Ok(handled);
        };
        match &handled {
            Handled::Vote(result) => {
                metrics.votes_received.inc();
                match result {
                    Ok(VoteOutcome::Recorded(_)) => {
                        metrics.votes_recorded.inc();
                        self.refresh_gauges();
                    }
                    Ok(VoteOutcome::AlreadySeen(_)) => {}
                    Err(rejection) => metrics.record_rejection(rejection.reason()),
                }
            }
            Handled::Served { .. } => metrics.sync_requests_served.inc(),
            _ => {}
        }
        Ok(handled)
    }

    /// A new block was connected at `tip`.
    pub fn on_new_tip(&self, tip: BlockHeight) -> Option<SelfVote> {
        let result = self.engine.update_block_tip(tip);
        if let (Some(SelfVote::Cast(_)), Some(metrics)) = (&result, &self.metrics) {
            metrics.self_votes_cast.inc();
            metrics.votes_recorded.inc();
            self.refresh_gauges();
        }
        result
    }

    /// Drop votes past the retention window. Returns how many went.
    pub fn maintain(&self) -> usize {
        let registry = self.engine.registry();
        let removed = self
            .engine
            .clean(registry.enabled_count(), registry.best_height());
        self.refresh_gauges();
        removed
    }

    fn refresh_gauges(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.set_ledger_size(self.engine.vote_count(), self.engine.block_count());
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Load, then clean and dump on their timers until `shutdown` fires.
    /// The ledger is written one last time on the way out.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<(), NodeError> {
        match self.load() {
            Ok(_) => {}
            Err(LoadError::FileOpen(e)) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.config.payments_path().display(), "no payment votes file, starting empty");
            }
            Err(e) => warn!(code = e.code(), "failed to load payment votes: {e}"),
        }

        let dump_every = self.config.dump_interval();
        let clean_every = self.config.maintenance_interval();
        let mut dump_timer = interval_at(Instant::now() + dump_every, dump_every);
        let mut clean_timer = interval_at(Instant::now() + clean_every, clean_every);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    info!("payments service shutting down");
                    break;
                }
                _ = clean_timer.tick() => {
                    self.maintain();
                }
                _ = dump_timer.tick() => {
                    if let Err(e) = self.dump().await {
                        warn!("failed to write payment votes: {e}");
                    }
                }
            }
        }

        self.dump().await
    }
}
