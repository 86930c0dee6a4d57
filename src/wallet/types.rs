//! Core types for wallet reputation
//!
//! Defines the tracked wallet entity, its tier and raw performance metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Discrete reputation bucket, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    /// Below the score floor or outside the tiered population share
    #[default]
    #[serde(rename = "ignore")]
    Ignore,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::Ignore => "ignore",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "S" | "s" => Ok(Tier::S),
            "A" | "a" => Ok(Tier::A),
            "B" | "b" => Ok(Tier::B),
            "ignore" | "IGNORE" => Ok(Tier::Ignore),
            other => Err(Error::Config(format!("Unknown tier: {}", other))),
        }
    }
}

/// Aggregate performance metrics for a wallet.
///
/// Every field is optional: a wallet discovered from an event has no
/// leaderboard data until discovery fills it in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletMetrics {
    /// Total equity / account value in USD
    #[serde(default)]
    pub account_value_usd: Option<f64>,
    /// All-time PnL in USD
    #[serde(default)]
    pub pnl_all_usd: Option<f64>,
    /// All-time ROI as a fraction (0.5 = 50%)
    #[serde(default)]
    pub roi_all: Option<f64>,
}

impl WalletMetrics {
    pub fn new(account_value_usd: f64, pnl_all_usd: f64, roi_all: f64) -> Self {
        Self {
            account_value_usd: Some(account_value_usd),
            pnl_all_usd: Some(pnl_all_usd),
            roi_all: Some(roi_all),
        }
    }
}

/// A tracked wallet. Score and tier are rewritten every cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    /// Lowercase address (primary key)
    pub address: String,
    /// Optional human label (tracked wallets)
    #[serde(default)]
    pub label: Option<String>,
    /// Smart score, 0-100
    #[serde(default)]
    pub smart_score: f64,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub metrics: WalletMetrics,
    pub last_updated_at: DateTime<Utc>,
}

impl Wallet {
    /// A freshly seen wallet: score 0, tier ignore, no metrics
    pub fn new(address: &str) -> Self {
        Self {
            address: normalize_address(address),
            label: None,
            smart_score: 0.0,
            tier: Tier::Ignore,
            metrics: WalletMetrics::default(),
            last_updated_at: Utc::now(),
        }
    }
}

/// Case-normalize a wallet address. Addresses are keyed lowercase everywhere.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}
