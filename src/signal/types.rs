//! Signal records
//!
//! A signal is an append-only fact: one qualifying directional action by a
//! wallet, with the wallet's score and tier frozen at creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::wallet::types::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    SpotBuy,
    SpotSell,
    PerpOpenLong,
    PerpOpenShort,
}

impl SignalType {
    pub fn is_spot(&self) -> bool {
        matches!(self, SignalType::SpotBuy | SignalType::SpotSell)
    }

    pub fn is_perp(&self) -> bool {
        !self.is_spot()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::SpotBuy => "SPOT_BUY",
            SignalType::SpotSell => "SPOT_SELL",
            SignalType::PerpOpenLong => "PERP_OPEN_LONG",
            SignalType::PerpOpenShort => "PERP_OPEN_SHORT",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub id: Uuid,
    pub signal_type: SignalType,
    pub wallet_address: String,
    /// Wallet score when the signal was created
    pub wallet_score: f64,
    /// Wallet tier when the signal was created
    pub wallet_tier: Tier,
    pub token_symbol: String,

    // Spot context
    pub chain_id: Option<String>,
    pub token_address: Option<String>,
    pub liquidity_usd: Option<f64>,

    // Perp context
    pub perp_platform: Option<String>,
    pub pair: Option<String>,
    pub leverage: Option<f64>,

    /// Execution price (spot) or entry price (perp)
    pub price: f64,
    pub size_usd: f64,
    pub created_at: DateTime<Utc>,
}
