//! The running SEEK node: constructs the pipeline from its boundary
//! implementations and owns the background housekeeping tasks.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use seek_identity::{CredentialLedger, IdentityVerifier};
use seek_settlement::{
    FinalizationQueue, FinalizationWorker, FinalizePassStats, SettlementContract,
    SettlementSequencer,
};
use seek_store::MissionCatalog;
use seek_types::Timestamp;
use seek_verification::{
    Adjudicator, AntiFraudPreChecker, MetadataExtractor, PassthroughExtractor, PrecheckPolicy,
    VisionProvider,
};

use crate::config::NodeConfig;
use crate::service::BountyService;
use crate::shutdown::ShutdownController;

/// Operational status surface. Stuck settlements appear here so an
/// operator sees them without grepping logs.
#[derive(Clone, Debug, Serialize)]
pub struct StatusReport {
    pub active_bounties: usize,
    pub queued_finalizations: usize,
    pub stuck_settlements: Vec<String>,
}

/// A running SEEK bounty node.
pub struct SeekNode {
    pub config: NodeConfig,
    pub service: Arc<BountyService>,
    pub identity: Arc<IdentityVerifier>,
    pub shutdown: Arc<ShutdownController>,
    worker: Arc<FinalizationWorker>,
    queue: Arc<Mutex<FinalizationQueue>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl SeekNode {
    /// Build the node from its configuration and boundary implementations.
    /// The contract, vision provider, and credential ledger are injected so
    /// tests can run the full pipeline against mocks.
    pub fn new(
        config: NodeConfig,
        contract: Arc<dyn SettlementContract>,
        provider: Arc<dyn VisionProvider>,
        ledger: Arc<dyn CredentialLedger>,
    ) -> Self {
        let params = config.params.clone();

        let queue = Arc::new(Mutex::new(FinalizationQueue::new()));
        let sequencer = SettlementSequencer::new(
            contract.clone(),
            queue.clone(),
            params.challenge_window_secs,
        );
        let worker = Arc::new(FinalizationWorker::new(
            contract,
            queue.clone(),
            params.finalize_max_attempts,
        ));

        let policy = if config.bypass_prechecks {
            tracing::warn!("anti-fraud pre-checks are bypassed");
            PrecheckPolicy::Bypassed
        } else {
            PrecheckPolicy::Enforced
        };
        let adjudicator = Adjudicator::new(provider, AntiFraudPreChecker::new(policy));

        let extractor: Arc<dyn MetadataExtractor> = Arc::new(PassthroughExtractor);
        let service = Arc::new(BountyService::new(
            params.clone(),
            Arc::new(MissionCatalog::builtin()),
            adjudicator,
            extractor,
            sequencer,
        ));

        let identity = Arc::new(IdentityVerifier::new(ledger, params.nonce_ttl_secs));

        Self {
            config,
            service,
            identity,
            shutdown: Arc::new(ShutdownController::new()),
            worker,
            queue,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn the background housekeeping tasks.
    pub fn start(&self) {
        let params = &self.config.params;
        let mut handles = self.handles.lock().expect("task handle list poisoned");
        handles.push(spawn_interval_task(
            "expiry_sweep",
            Duration::from_secs(params.expiry_sweep_interval_secs),
            self.shutdown.clone(),
            {
                let service = self.service.clone();
                move || {
                    let service = service.clone();
                    async move {
                        service.sweep_expired(Timestamp::now());
                    }
                }
            },
        ));

        handles.push(spawn_interval_task(
            "retention_purge",
            Duration::from_secs(params.purge_interval_secs),
            self.shutdown.clone(),
            {
                let service = self.service.clone();
                move || {
                    let service = service.clone();
                    async move {
                        service.purge_terminal(Timestamp::now());
                    }
                }
            },
        ));

        handles.push(spawn_interval_task(
            "finalization_poll",
            Duration::from_secs(params.finalize_poll_interval_secs),
            self.shutdown.clone(),
            {
                let worker = self.worker.clone();
                move || {
                    let worker = worker.clone();
                    async move {
                        let stats = worker.run_once(Timestamp::now()).await;
                        if stats.finalized + stats.failed + stats.exhausted > 0 {
                            tracing::debug!(?stats, "finalization pass complete");
                        }
                    }
                }
            },
        ));

        handles.push(spawn_interval_task(
            "nonce_sweep",
            Duration::from_secs(params.nonce_sweep_interval_secs),
            self.shutdown.clone(),
            {
                let identity = self.identity.clone();
                move || {
                    let identity = identity.clone();
                    async move {
                        identity.sweep_nonces(Timestamp::now());
                    }
                }
            },
        ));

        tracing::info!(tasks = handles.len(), "background tasks started");
    }

    /// Run one finalization pass immediately. The poll task calls this on
    /// its interval; exposing it keeps the pass driveable from tests and
    /// ops tooling.
    pub async fn run_finalization_pass(&self, now: Timestamp) -> FinalizePassStats {
        self.worker.run_once(now).await
    }

    /// Current operational status.
    pub fn status(&self) -> StatusReport {
        StatusReport {
            active_bounties: self.service.active_count(),
            queued_finalizations: self
                .queue
                .lock()
                .expect("finalization queue poisoned")
                .len(),
            stuck_settlements: self
                .worker
                .stuck_settlements()
                .into_iter()
                .map(|a| a.as_str().to_string())
                .collect(),
        }
    }

    /// Signal shutdown and wait for the background tasks to exit.
    pub async fn stop(&self) {
        self.shutdown.shutdown();
        let handles: Vec<JoinHandle<()>> = {
            let mut handles = self.handles.lock().expect("task handle list poisoned");
            handles.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.await;
        }
        tracing::info!("node stopped");
    }
}

/// Spawn a shutdown-aware interval loop.
fn spawn_interval_task<F, Fut>(
    name: &'static str,
    period: Duration,
    shutdown: Arc<ShutdownController>,
    mut tick: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send,
{
    let mut shutdown_rx = shutdown.subscribe();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    tracing::debug!(task = name, "background task stopping");
                    break;
                }
                _ = interval.tick() => {
                    tick().await;
                }
            }
        }
    })
}
