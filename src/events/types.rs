//! Normalized spot and perp event records
//!
//! These arrive already decoded from the chain / exchange connectors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PerpEventType {
    Open,
    Close,
    Increase,
    Decrease,
}

impl PerpEventType {
    /// Entry or add-to-position events; the only ones that become signals
    pub fn is_entry(&self) -> bool {
        matches!(self, PerpEventType::Open | PerpEventType::Increase)
    }
}

/// A DEX swap by a wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotEvent {
    pub wallet_address: String,
    pub chain_id: String,
    pub dex: String,
    pub tx_hash: String,
    /// Unix seconds or milliseconds
    pub timestamp: i64,
    pub token_address: String,
    pub token_symbol: String,
    pub side: Side,
    pub amount_usd: f64,
    pub price: f64,
    pub liquidity_usd: f64,
}

impl SpotEvent {
    pub fn validate(&self) -> Result<()> {
        if self.token_symbol.trim().is_empty() {
            return Err(Error::MalformedEvent(format!(
                "spot event {} has no token symbol",
                self.tx_hash
            )));
        }
        check_amount("amount_usd", self.amount_usd)?;
        check_amount("price", self.price)?;
        check_amount("liquidity_usd", self.liquidity_usd)
    }
}

/// A perp position change by a wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerpEvent {
    pub wallet_address: String,
    pub platform: String,
    /// e.g. "BTC-PERP", "ETH-USD"
    pub pair: String,
    pub direction: Direction,
    pub event_type: PerpEventType,
    pub entry_price: f64,
    pub size_usd: f64,
    pub leverage: f64,
    /// Unix seconds or milliseconds
    pub timestamp: i64,
}

impl PerpEvent {
    /// Asset symbol: the pair up to the first `-`
    pub fn symbol(&self) -> &str {
        self.pair.split('-').next().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol().trim().is_empty() {
            return Err(Error::MalformedEvent(format!(
                "perp event on {} has no asset in pair {:?}",
                self.platform, self.pair
            )));
        }
        check_amount("entry_price", self.entry_price)?;
        check_amount("size_usd", self.size_usd)?;
        check_amount("leverage", self.leverage)
    }
}

fn check_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::MalformedEvent(format!("{} = {}", field, value)));
    }
    Ok(())
}

/// One fetch worth of events from all sources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventBatch {
    #[serde(default)]
    pub spot: Vec<SpotEvent>,
    #[serde(default)]
    pub perp: Vec<PerpEvent>,
}

impl EventBatch {
    pub fn len(&self) -> usize {
        self.spot.len() + self.perp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spot.is_empty() && self.perp.is_empty()
    }

    pub fn extend(&mut self, other: EventBatch) {
        self.spot.extend(other.spot);
        self.perp.extend(other.perp);
    }
}

/// Decode raw spot records, skipping any that fail to deserialize
pub fn decode_spot_batch(raw: Vec<Value>) -> Vec<SpotEvent> {
    decode_batch(raw, "spot")
}

/// Decode raw perp records, skipping any that fail to deserialize
pub fn decode_perp_batch(raw: Vec<Value>) -> Vec<PerpEvent> {
    decode_batch(raw, "perp")
}

fn decode_batch<T: serde::de::DeserializeOwned>(raw: Vec<Value>, kind: &str) -> Vec<T> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(kind, index = i, error = %e, "Skipping malformed event");
                None
            }
        })
        .collect()
}
