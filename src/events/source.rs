//! Event source collaborators
//!
//! Real connectors (on-chain log decoding, exchange polling) live outside
//! this crate and implement [`EventSource`]. Two local sources ship here:
//! a mock that emits a fixed spot buy + perp long every fetch, and a file
//! spool that reads [`EventBatch`] JSON files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::events::types::{
    decode_perp_batch, decode_spot_batch, Direction, EventBatch, PerpEvent, PerpEventType, Side, SpotEvent,
};

/// Supplies normalized events once per cycle
#[async_trait]
pub trait EventSource: Send {
    /// Source name for logging
    fn name(&self) -> &str;

    /// Fetch everything new since the previous call
    async fn fetch(&mut self) -> Result<EventBatch>;
}

/// Deterministic source for dry runs
pub struct MockEventSource {
    wallet: String,
    chain_id: String,
    platform: String,
    block: u64,
}

impl MockEventSource {
    pub fn new() -> Self {
        Self {
            wallet: "0xMOCKWALLET".to_string(),
            chain_id: "mock".to_string(),
            platform: "mock_perp".to_string(),
            block: 0,
        }
    }

    pub fn with_wallet(wallet: impl Into<String>) -> Self {
        Self {
            wallet: wallet.into(),
            ..Self::new()
        }
    }
}

impl Default for MockEventSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&mut self) -> Result<EventBatch> {
        self.block += 1;
        let now = chrono::Utc::now().timestamp();

        Ok(EventBatch {
            spot: vec![SpotEvent {
                wallet_address: self.wallet.clone(),
                chain_id: self.chain_id.clone(),
                dex: "mock_dex".to_string(),
                tx_hash: format!("0xMOCKTX{}", self.block),
                timestamp: now,
                token_address: "0xMOCKTOKEN".to_string(),
                token_symbol: "MOCK".to_string(),
                side: Side::Buy,
                amount_usd: 10_000.0,
                price: 1.0,
                liquidity_usd: 500_000.0,
            }],
            perp: vec![PerpEvent {
                wallet_address: self.wallet.clone(),
                platform: self.platform.clone(),
                pair: "MOCK-PERP".to_string(),
                direction: Direction::Long,
                event_type: PerpEventType::Open,
                entry_price: 1.0,
                size_usd: 50_000.0,
                leverage: 3.0,
                timestamp: now,
            }],
        })
    }
}

/// Reads `EventBatch` JSON files.
///
/// If `path` is a file it is read on the first fetch only. If it is a
/// directory, every fetch picks up `*.json` files not seen before, in
/// file-name order. A file that cannot be read or parsed is logged and
/// marked seen so it is not retried.
pub struct FileEventSource {
    path: PathBuf,
    seen: HashSet<PathBuf>,
}

impl FileEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seen: HashSet::new(),
        }
    }

    async fn pending_files(&self) -> Result<Vec<PathBuf>> {
        if !self.path.is_dir() {
            return Ok(vec![self.path.clone()]);
        }

        let mut files = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.path).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    async fn read_batch(path: &Path) -> Result<EventBatch> {
        let data = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::EventSource(format!("{}: {}", path.display(), e)))?;
        let mut raw: Value = serde_json::from_str(&data)
            .map_err(|e| Error::EventSource(format!("{}: {}", path.display(), e)))?;

        Ok(EventBatch {
            spot: decode_spot_batch(take_array(&mut raw, "spot")),
            perp: decode_perp_batch(take_array(&mut raw, "perp")),
        })
    }
}

fn take_array(raw: &mut Value, field: &str) -> Vec<Value> {
    match raw.get_mut(field).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

#[async_trait]
impl EventSource for FileEventSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&mut self) -> Result<EventBatch> {
        let mut batch = EventBatch::default();
        for path in self.pending_files().await? {
            if self.seen.contains(&path) {
                continue;
            }
            match Self::read_batch(&path).await {
                Ok(file_batch) => {
                    info!(file = %path.display(), events = file_batch.len(), "Loaded event batch");
                    batch.extend(file_batch);
                }
                Err(e) => warn!(error = %e, "Skipping unreadable event batch"),
            }
            self.seen.insert(path);
        }
        debug!(events = batch.len(), "File source fetch complete");
        Ok(batch)
    }
}
