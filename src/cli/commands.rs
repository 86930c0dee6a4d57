//! CLI command implementations

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{Config, SinkKind, StorageBackend};
use crate::engine::Engine;
use crate::events::{EventSource, FileEventSource, MockEventSource};
use crate::notify::{AlertSink, LogSink};
use crate::storage::{JsonFileStore, MemoryStore, Storage};
use crate::wallet::{parse_leaderboard, ScoreEngine, WalletMetrics};

/// Storage backend selected by configuration
pub async fn build_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage - nothing will persist across runs");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Json => Arc::new(
            JsonFileStore::open(&config.storage.data_dir)
                .await
                .with_context(|| format!("Failed to open data dir {}", config.storage.data_dir))?,
        ),
    };
    Ok(storage)
}

/// Alert sink selected by configuration
pub fn build_sink(config: &Config) -> Arc<dyn AlertSink> {
    match config.notify.sink {
        SinkKind::Log => Arc::new(LogSink::new()),
    }
}

/// Run the cycle loop
pub async fn run(
    config: Config,
    config_path: &Path,
    once: bool,
    mock: bool,
    events: Option<String>,
) -> Result<()> {
    let mut source: Box<dyn EventSource> = match (mock, events) {
        (true, _) => Box::new(MockEventSource::new()),
        (false, Some(path)) => Box::new(FileEventSource::new(path)),
        (false, None) => anyhow::bail!("No event source: pass --mock or --events <file>"),
    };

    let storage = build_storage(&config).await?;
    let sink = build_sink(&config);
    let engine = Engine::new(storage, sink).with_tracked(&config.tracked_wallets);

    engine
        .seed_tracked()
        .await
        .context("Failed to seed tracked wallets")?;

    info!(
        source = source.name(),
        interval_secs = config.engine.cycle_interval_secs,
        "Starting smart money engine"
    );

    engine.run(source.as_mut(), config, config_path, once).await?;
    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.summary());
    Ok(())
}

/// Print the score breakdown for a set of metrics
pub fn score(roi: Option<f64>, equity: Option<f64>, pnl: Option<f64>) -> Result<()> {
    let metrics = WalletMetrics {
        account_value_usd: equity,
        pnl_all_usd: pnl,
        roi_all: roi,
    };
    let breakdown = ScoreEngine::new().breakdown(&metrics);

    println!("\n=== SMART SCORE ===\n");
    println!("ROI sub-score:    {:>6.2}  (x0.60)", breakdown.roi_score);
    println!("Equity sub-score: {:>6.2}  (x0.25)", breakdown.equity_score);
    println!("PnL sub-score:    {:>6.2}  (x0.15)", breakdown.pnl_score);
    println!("Smart score:      {:>6.2}", breakdown.value);

    Ok(())
}

/// Import a leaderboard snapshot from a local JSON file
pub async fn discover(config: &Config, file: &Path) -> Result<()> {
    let data = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let raw: serde_json::Value =
        serde_json::from_str(&data).with_context(|| format!("Invalid JSON in {}", file.display()))?;

    let entries = parse_leaderboard(&raw, config.discovery.top_n, config.discovery.min_account_value);
    info!("Parsed {} leaderboard entries from {}", entries.len(), file.display());

    let engine = Engine::new(build_storage(config).await?, build_sink(config));
    let report = engine.apply_discovery(&entries).await?;

    println!(
        "Discovery: {} wallets created, {} refreshed",
        report.created, report.refreshed
    );
    Ok(())
}
