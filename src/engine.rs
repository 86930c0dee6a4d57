//! Cycle engine
//!
//! Runs the full decision pipeline once per cycle against a storage backend
//! and an alert sink.
//!
//! # Architecture
//!
//! ```text
//! EventSource ─► group ─► score/tier recompute ─► SignalGenerator
//!                              (Storage)                 │
//!                                                        ▼
//!           AlertSink ◄─ AlertAssembler ◄─ ConfluenceResolver
//! ```
//!
//! Cycles are strictly sequential. Every component in a cycle sees the
//! wallet snapshot taken after that cycle's recompute.

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::{Config, CoreConfig};
use crate::confluence::{AlertAssembler, ConfluenceResolver};
use crate::error::Result;
use crate::events::{group_events, EventBatch, EventSource};
use crate::notify::AlertSink;
use crate::signal::{GenerationStats, SignalGenerator};
use crate::storage::Storage;
use crate::wallet::{
    normalize_address, LeaderboardEntry, ScoreEngine, TierAssigner, TrackedRegistry, TrackedWallet, Wallet,
};

/// Counters for one processing cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleReport {
    pub events: usize,
    pub groups: usize,
    pub wallets_scored: usize,
    pub wallets_registered: usize,
    pub generation: GenerationStats,
    pub signals: usize,
    /// Groups resolved to MIXED or NONE
    pub dropped_groups: usize,
    pub alerts: usize,
    /// Alerts raised by configured tracked wallets
    pub tracked_alerts: usize,
    pub delivery_failures: usize,
}

/// Result of importing a leaderboard snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    pub created: usize,
    pub refreshed: usize,
}

pub struct Engine {
    storage: Arc<dyn Storage>,
    sink: Arc<dyn AlertSink>,
    scorer: ScoreEngine,
    tracked: TrackedRegistry,
}

impl Engine {
    pub fn new(storage: Arc<dyn Storage>, sink: Arc<dyn AlertSink>) -> Self {
        Self {
            storage,
            sink,
            scorer: ScoreEngine::new(),
            tracked: TrackedRegistry::default(),
        }
    }

    /// Attach the configured tracked wallets
    pub fn with_tracked(mut self, tracked: &[TrackedWallet]) -> Self {
        self.tracked = TrackedRegistry::new(tracked);
        self
    }

    /// Run one full pass over a batch of events
    pub async fn run_cycle(&self, core: &CoreConfig, batch: EventBatch) -> Result<CycleReport> {
        let mut report = CycleReport {
            events: batch.len(),
            ..Default::default()
        };

        let groups = group_events(&batch.spot, &batch.perp);
        report.groups = groups.len();

        let snapshot = self.recompute_wallets(core).await?;
        report.wallets_scored = snapshot.len();

        let generation = SignalGenerator::new(core.signals.clone()).generate(&groups, &snapshot)?;
        report.generation = generation.stats.clone();
        report.signals = generation.signals.len();

        let registered = self.storage.insert_wallets_if_absent(generation.new_wallets).await?;
        for address in &registered {
            info!(wallet = %address, "Registered new wallet");
        }
        report.wallets_registered = registered.len();

        self.storage.append_signals(&generation.signals).await?;

        let assembler = AlertAssembler::new(core.risk_per_trade_default);
        let mut alerts = Vec::new();
        for resolution in ConfluenceResolver::new().resolve(&generation.signals) {
            match assembler.assemble(&resolution) {
                Some(mut alert) => {
                    if let Some(tracked) = self.tracked.get(&alert.wallet_address) {
                        info!(
                            wallet = %alert.wallet_address,
                            label = tracked.label.as_deref().unwrap_or("-"),
                            mode = %alert.mode,
                            "Tracked wallet alert"
                        );
                        alert.wallet_label = tracked.label.clone();
                        report.tracked_alerts += 1;
                    }
                    alerts.push(alert);
                }
                None => {
                    debug!(
                        wallet = %resolution.key.wallet_address,
                        asset = %resolution.key.asset,
                        mode = %resolution.mode,
                        "Dropping non-actionable group"
                    );
                    report.dropped_groups += 1;
                }
            }
        }
        report.alerts = alerts.len();

        self.storage.append_alerts(&alerts).await?;

        for alert in &alerts {
            if let Err(e) = self.sink.deliver(alert).await {
                warn!(
                    alert_id = %alert.id,
                    sink = self.sink.name(),
                    error = %e,
                    "Alert delivery failed"
                );
                report.delivery_failures += 1;
            }
        }

        info!(
            events = report.events,
            groups = report.groups,
            wallets = report.wallets_scored,
            registered = report.wallets_registered,
            signals = report.signals,
            dropped = report.dropped_groups,
            alerts = report.alerts,
            tracked_alerts = report.tracked_alerts,
            "Cycle complete"
        );

        Ok(report)
    }

    /// Rescore and retier the whole population, persist it, and return the snapshot
    async fn recompute_wallets(&self, core: &CoreConfig) -> Result<HashMap<String, Wallet>> {
        let mut wallets: Vec<Wallet> = self.storage.load_wallets().await?.into_values().collect();
        wallets.sort_by(|a, b| a.address.cmp(&b.address));

        let scores: Vec<f64> = wallets.iter().map(|w| self.scorer.score(&w.metrics)).collect();
        let tiers = TierAssigner::new(core.tiering.clone()).assign(&scores);

        let now = chrono::Utc::now();
        for ((wallet, score), tier) in wallets.iter_mut().zip(scores).zip(tiers) {
            if wallet.tier != tier {
                debug!(wallet = %wallet.address, from = %wallet.tier, to = %tier, score, "Tier changed");
            }
            wallet.smart_score = score;
            wallet.tier = tier;
            wallet.last_updated_at = now;
        }

        self.storage.upsert_wallets(&wallets).await?;

        Ok(wallets.into_iter().map(|w| (w.address.clone(), w)).collect())
    }

    /// Upsert the tracked wallets with their seed score and tier
    pub async fn seed_tracked(&self) -> Result<usize> {
        if self.tracked.is_empty() {
            return Ok(0);
        }

        let existing = self.storage.load_wallets().await?;
        let now = chrono::Utc::now();

        let seeded: Vec<Wallet> = self
            .tracked
            .iter()
            .map(|t| {
                let address = normalize_address(&t.address);
                let mut wallet = existing
                    .get(&address)
                    .cloned()
                    .unwrap_or_else(|| Wallet::new(&address));
                if t.label.is_some() {
                    wallet.label = t.label.clone();
                }
                wallet.smart_score = t.initial_score;
                wallet.tier = t.initial_tier;
                wallet.last_updated_at = now;
                wallet
            })
            .collect();

        self.storage.upsert_wallets(&seeded).await?;
        info!("Seeded {} tracked wallets", seeded.len());

        Ok(seeded.len())
    }

    /// Create missing wallets and refresh metrics of known ones
    pub async fn apply_discovery(&self, entries: &[LeaderboardEntry]) -> Result<DiscoveryReport> {
        let existing = self.storage.load_wallets().await?;
        let now = chrono::Utc::now();
        let mut report = DiscoveryReport::default();

        let updated: Vec<Wallet> = entries
            .iter()
            .map(|entry| {
                let address = normalize_address(&entry.address);
                let mut wallet = match existing.get(&address) {
                    Some(w) => {
                        report.refreshed += 1;
                        w.clone()
                    }
                    None => {
                        report.created += 1;
                        Wallet::new(&address)
                    }
                };
                wallet.metrics = entry.metrics;
                wallet.last_updated_at = now;
                wallet
            })
            .collect();

        self.storage.upsert_wallets(&updated).await?;
        info!(
            created = report.created,
            refreshed = report.refreshed,
            "Applied leaderboard discovery"
        );

        Ok(report)
    }

    /// Cycle loop. Returns the number of cycles run.
    ///
    /// Stops after one cycle when `once` is set, after `engine.max_cycles`,
    /// or on ctrl-c. A failed cycle is logged and the loop carries on.
    pub async fn run(
        &self,
        source: &mut dyn EventSource,
        mut config: Config,
        config_path: &Path,
        once: bool,
    ) -> Result<u64> {
        let mut cycles: u64 = 0;

        loop {
            if config.engine.reload_config && cycles > 0 {
                match Config::load(config_path) {
                    Ok(fresh) => config = fresh,
                    Err(e) => warn!("Config reload failed, keeping previous: {:#}", e),
                }
            }

            let core = config.core();
            match source.fetch().await {
                Ok(batch) => {
                    if let Err(e) = self.run_cycle(&core, batch).await {
                        error!(cycle = cycles + 1, "Cycle aborted: {}", e);
                    }
                }
                Err(e) => error!(source = source.name(), "Event fetch failed: {}", e),
            }
            cycles += 1;

            if once || config.engine.max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(config.engine.cycle_interval_secs)) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        info!("Engine stopped after {} cycles", cycles);
        Ok(cycles)
    }
}
