//! Event-to-signal filtering
//!
//! Turns grouped events into signals for wallets that pass the eligibility
//! rules. A failing rule skips one event, never the batch.
//!
//! Rules, in order:
//! 1. The wallet resolves (unseen wallets are registered at score 0 / ignore)
//! 2. Spot: `amount_usd >= min_spot_size_usd`
//! 3. Perp: tier allowed by policy, `size_usd >= min_perp_size_usd`,
//!    event is OPEN or INCREASE

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::events::grouper::{GroupKey, GroupedEvents};
use crate::events::types::{Direction, PerpEvent, Side, SpotEvent};
use crate::signal::policy::PerpEligibilityPolicy;
use crate::signal::types::{Signal, SignalType};
use crate::wallet::types::Wallet;

/// Timestamps above this are treated as milliseconds
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Signal eligibility thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalFilterConfig {
    /// Minimum spot trade size (inclusive)
    pub min_spot_size_usd: f64,
    /// Minimum perp position size (inclusive)
    pub min_perp_size_usd: f64,
    /// Which tiers may emit perp signals
    pub perp_eligibility: PerpEligibilityPolicy,
}

impl Default for SignalFilterConfig {
    fn default() -> Self {
        Self {
            min_spot_size_usd: 5_000.0,
            min_perp_size_usd: 50_000.0,
            perp_eligibility: PerpEligibilityPolicy::default(),
        }
    }
}

/// Per-rule skip counters for one generation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub spot_events: usize,
    pub perp_events: usize,
    pub spot_below_min: usize,
    pub perp_tier_ineligible: usize,
    pub perp_below_min: usize,
    pub perp_not_entry: usize,
    pub malformed: usize,
}

/// Output of one generation pass
#[derive(Debug, Clone, Default)]
pub struct Generation {
    pub signals: Vec<Signal>,
    /// Wallets first seen in this batch; the caller registers them
    pub new_wallets: Vec<Wallet>,
    pub stats: GenerationStats,
}

pub struct SignalGenerator {
    config: SignalFilterConfig,
}

impl SignalGenerator {
    pub fn new(config: SignalFilterConfig) -> Self {
        Self { config }
    }

    /// Generate signals against a wallet snapshot keyed by lowercase address
    pub fn generate(
        &self,
        groups: &GroupedEvents,
        wallets: &HashMap<String, Wallet>,
    ) -> Result<Generation> {
        let mut out = Generation::default();
        let mut registered: HashMap<String, Wallet> = HashMap::new();

        for (key, group) in groups {
            let wallet: &Wallet = match wallets.get(&key.wallet_address) {
                Some(w) => w,
                None => &*registered.entry(key.wallet_address.clone()).or_insert_with(|| {
                    debug!(wallet = %key.wallet_address, "Registering unseen wallet");
                    Wallet::new(&key.wallet_address)
                }),
            };

            for event in &group.spot {
                out.stats.spot_events += 1;
                match self.spot_signal(wallet, key, event, &mut out.stats) {
                    Ok(Some(signal)) => out.signals.push(signal),
                    Ok(None) => {}
                    Err(e) if e.is_event_scoped() => {
                        warn!(wallet = %key.wallet_address, tx = %event.tx_hash, error = %e, "Skipping spot event");
                        out.stats.malformed += 1;
                    }
                    Err(e) => return Err(e),
                }
            }

            for event in &group.perp {
                out.stats.perp_events += 1;
                match self.perp_signal(wallet, key, event, &mut out.stats) {
                    Ok(Some(signal)) => out.signals.push(signal),
                    Ok(None) => {}
                    Err(e) if e.is_event_scoped() => {
                        warn!(wallet = %key.wallet_address, pair = %event.pair, error = %e, "Skipping perp event");
                        out.stats.malformed += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        out.new_wallets = registered.into_values().collect();
        out.new_wallets.sort_by(|a, b| a.address.cmp(&b.address));

        info!(
            signals = out.signals.len(),
            new_wallets = out.new_wallets.len(),
            "Created {} signals",
            out.signals.len()
        );
        Ok(out)
    }

    fn spot_signal(
        &self,
        wallet: &Wallet,
        key: &GroupKey,
        event: &SpotEvent,
        stats: &mut GenerationStats,
    ) -> Result<Option<Signal>> {
        event.validate()?;

        if event.amount_usd < self.config.min_spot_size_usd {
            stats.spot_below_min += 1;
            return Ok(None);
        }

        let signal_type = match event.side {
            Side::Buy => SignalType::SpotBuy,
            Side::Sell => SignalType::SpotSell,
        };

        Ok(Some(Signal {
            id: Uuid::new_v4(),
            signal_type,
            wallet_address: wallet.address.clone(),
            wallet_score: wallet.smart_score,
            wallet_tier: wallet.tier,
            token_symbol: key.asset.clone(),
            chain_id: Some(event.chain_id.clone()),
            token_address: Some(event.token_address.clone()),
            liquidity_usd: Some(event.liquidity_usd),
            perp_platform: None,
            pair: None,
            leverage: None,
            price: event.price,
            size_usd: event.amount_usd,
            created_at: normalize_timestamp(event.timestamp),
        }))
    }

    fn perp_signal(
        &self,
        wallet: &Wallet,
        key: &GroupKey,
        event: &PerpEvent,
        stats: &mut GenerationStats,
    ) -> Result<Option<Signal>> {
        event.validate()?;

        if !self.config.perp_eligibility.allows(wallet.tier) {
            stats.perp_tier_ineligible += 1;
            return Ok(None);
        }
        if event.size_usd < self.config.min_perp_size_usd {
            stats.perp_below_min += 1;
            return Ok(None);
        }
        if !event.event_type.is_entry() {
            stats.perp_not_entry += 1;
            return Ok(None);
        }

        let signal_type = match event.direction {
            Direction::Long => SignalType::PerpOpenLong,
            Direction::Short => SignalType::PerpOpenShort,
        };

        Ok(Some(Signal {
            id: Uuid::new_v4(),
            signal_type,
            wallet_address: wallet.address.clone(),
            wallet_score: wallet.smart_score,
            wallet_tier: wallet.tier,
            token_symbol: key.asset.clone(),
            chain_id: None,
            token_address: None,
            liquidity_usd: None,
            perp_platform: Some(event.platform.clone()),
            pair: Some(event.pair.clone()),
            leverage: Some(event.leverage),
            price: event.entry_price,
            size_usd: event.size_usd,
            created_at: normalize_timestamp(event.timestamp),
        }))
    }
}

/// Convert a seconds-or-milliseconds unix timestamp to UTC, falling back to now
pub fn normalize_timestamp(ts: i64) -> DateTime<Utc> {
    let secs = if ts > MILLIS_THRESHOLD { ts / 1000 } else { ts };
    DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}
