//! Leaderboard discovery and tracked-wallet registry
//!
//! Discovery parses a perp-exchange leaderboard snapshot into wallet
//! metrics. Fetching the snapshot is the caller's job; this module only
//! reads it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::wallet::types::{normalize_address, Tier, WalletMetrics};

/// Leaderboard filter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Only the first N leaderboard rows are considered
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Rows below this account value are skipped
    #[serde(default = "default_min_account_value")]
    pub min_account_value: f64,
}

fn default_top_n() -> usize { 50 }
fn default_min_account_value() -> f64 { 10_000.0 }

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            min_account_value: default_min_account_value(),
        }
    }
}

/// One wallet extracted from a leaderboard row
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub address: String,
    pub metrics: WalletMetrics,
}

/// Parse a leaderboard payload of the form
/// `{"leaderboardRows": [{"ethAddress", "accountValue", "windowPerformances"}]}`.
///
/// Numbers may be encoded as strings. Rows that fail to parse are skipped.
pub fn parse_leaderboard(raw: &Value, top_n: usize, min_account_value: f64) -> Vec<LeaderboardEntry> {
    let Some(rows) = raw.get("leaderboardRows").and_then(Value::as_array) else {
        warn!("Leaderboard payload has no leaderboardRows");
        return Vec::new();
    };

    let mut entries = Vec::new();
    for row in rows.iter().take(top_n) {
        let Some(address) = row.get("ethAddress").and_then(Value::as_str) else {
            continue;
        };
        if address.trim().is_empty() {
            continue;
        }

        let account_value = row.get("accountValue").and_then(as_f64).unwrap_or(0.0);
        if account_value < min_account_value {
            debug!(address, account_value, "Leaderboard row below min account value");
            continue;
        }

        let (pnl_all, roi_all) = all_time_performance(row.get("windowPerformances"));
        entries.push(LeaderboardEntry {
            address: normalize_address(address),
            metrics: WalletMetrics {
                account_value_usd: Some(account_value),
                pnl_all_usd: pnl_all,
                roi_all,
            },
        });
    }
    entries
}

/// Extract (pnl, roi) for the all-time window.
///
/// Accepts either named windows `[["allTime", {"pnl": .., "roi": ..}], ..]`
/// or positional rows `[[pnl, roi, vlm] x4]` where the 4th row is all-time.
fn all_time_performance(windows: Option<&Value>) -> (Option<f64>, Option<f64>) {
    let Some(windows) = windows.and_then(Value::as_array) else {
        return (None, None);
    };

    let named = windows.iter().find_map(|w| {
        let pair = w.as_array()?;
        match (pair.first()?.as_str()?, pair.get(1)?) {
            ("allTime", perf) => Some(perf),
            _ => None,
        }
    });
    if let Some(perf) = named {
        return (
            perf.get("pnl").and_then(as_f64),
            perf.get("roi").and_then(as_f64),
        );
    }

    match windows.get(3).and_then(Value::as_array) {
        Some(row) => (
            row.first().and_then(as_f64),
            row.get(1).and_then(as_f64),
        ),
        None => (None, None),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// A wallet seeded from configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedWallet {
    pub address: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub initial_score: f64,
    #[serde(default = "default_initial_tier")]
    pub initial_tier: Tier,
}

fn default_initial_tier() -> Tier {
    Tier::A
}

/// Case-insensitive lookup over the configured tracked wallets
#[derive(Debug, Clone, Default)]
pub struct TrackedRegistry {
    wallets: HashMap<String, TrackedWallet>,
}

impl TrackedRegistry {
    pub fn new(wallets: &[TrackedWallet]) -> Self {
        Self {
            wallets: wallets
                .iter()
                .map(|w| (normalize_address(&w.address), w.clone()))
                .collect(),
        }
    }

    pub fn is_tracked(&self, address: &str) -> bool {
        self.wallets.contains_key(&normalize_address(address))
    }

    pub fn get(&self, address: &str) -> Option<&TrackedWallet> {
        self.wallets.get(&normalize_address(address))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedWallet> {
        self.wallets.values()
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}
