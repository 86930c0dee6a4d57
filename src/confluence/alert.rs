//! Alert assembly
//!
//! Turns an actionable resolution into an immutable alert record with its
//! trade setup and context snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::resolver::{Bias, Mode, Resolution, SignalStrength};
use super::setup::{SetupGenerator, TradeSetup};
use crate::signal::types::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    SpotOnly,
    PerpOnly,
    Hybrid,
}

impl AlertType {
    fn from_presence(spot: bool, perp: bool) -> Option<Self> {
        match (spot, perp) {
            (true, true) => Some(AlertType::Hybrid),
            (true, false) => Some(AlertType::SpotOnly),
            (false, true) => Some(AlertType::PerpOnly),
            (false, false) => None,
        }
    }
}

/// Snapshot of the latest spot signal in the group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotContext {
    pub bias: Bias,
    pub chain_id: Option<String>,
    pub token_symbol: String,
    pub token_address: Option<String>,
    pub price: f64,
    pub size_usd: f64,
    pub liquidity_usd: Option<f64>,
}

impl SpotContext {
    fn from_signal(signal: &Signal, bias: Bias) -> Self {
        Self {
            bias,
            chain_id: signal.chain_id.clone(),
            token_symbol: signal.token_symbol.clone(),
            token_address: signal.token_address.clone(),
            price: signal.price,
            size_usd: signal.size_usd,
            liquidity_usd: signal.liquidity_usd,
        }
    }
}

/// Snapshot of the latest perp signal in the group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerpContext {
    pub bias: Bias,
    pub platform: Option<String>,
    pub pair: Option<String>,
    /// Wallet's entry price
    pub entry_price: f64,
    pub size_usd: f64,
    pub leverage: Option<f64>,
}

impl PerpContext {
    fn from_signal(signal: &Signal, bias: Bias) -> Self {
        Self {
            bias,
            platform: signal.perp_platform.clone(),
            pair: signal.pair.clone(),
            entry_price: signal.price,
            size_usd: signal.size_usd,
            leverage: signal.leverage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub alert_type: AlertType,
    pub signal_strength: SignalStrength,
    pub mode: Mode,
    pub wallet_address: String,
    pub wallet_score: f64,
    /// Label of a configured tracked wallet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_label: Option<String>,
    pub token_symbol: String,
    pub spot_bias: Bias,
    pub perp_bias: Bias,
    pub spot: Option<SpotContext>,
    pub perp: Option<PerpContext>,
    pub setup: TradeSetup,
    /// Inputs that produced the alert, kept for audit
    pub raw_payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AlertAssembler {
    risk_per_trade: f64,
    setups: SetupGenerator,
}

impl AlertAssembler {
    pub fn new(risk_per_trade: f64) -> Self {
        Self {
            risk_per_trade,
            setups: SetupGenerator::new(),
        }
    }

    /// Build the alert for one resolution.
    ///
    /// Returns `None` for MIXED / NONE modes and for empty groups.
    pub fn assemble(&self, resolution: &Resolution) -> Option<Alert> {
        if !resolution.mode.is_actionable() {
            return None;
        }

        let latest = resolution.signals.last()?;
        let last_spot = resolution.spot_signals().last();
        let last_perp = resolution.perp_signals().last();
        let alert_type = AlertType::from_presence(last_spot.is_some(), last_perp.is_some())?;

        let setup = self.setups.setup(resolution.mode, latest.price, self.risk_per_trade);

        let raw_payload = json!({
            "wallet_address": resolution.key.wallet_address,
            "wallet_score": latest.wallet_score,
            "spot_bias": resolution.spot_bias,
            "perp_bias": resolution.perp_bias,
            "mode": resolution.mode,
        });

        Some(Alert {
            id: Uuid::new_v4(),
            alert_type,
            signal_strength: resolution.strength,
            mode: resolution.mode,
            wallet_address: resolution.key.wallet_address.clone(),
            wallet_score: latest.wallet_score,
            wallet_label: None,
            token_symbol: resolution.key.asset.clone(),
            spot_bias: resolution.spot_bias,
            perp_bias: resolution.perp_bias,
            spot: last_spot.map(|s| SpotContext::from_signal(s, resolution.spot_bias)),
            perp: last_perp.map(|s| PerpContext::from_signal(s, resolution.perp_bias)),
            setup,
            raw_payload,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confluence::resolver::ConfluenceResolver;
    use crate::confluence::setup::SetupMode;
    use crate::signal::types::SignalType;
    use crate::wallet::types::Tier;

    fn signal(signal_type: SignalType, price: f64, score: f64) -> Signal {
        Signal {
            id: Uuid::new_v4(),
            signal_type,
            wallet_address: "0xaa".into(),
            wallet_score: score,
            wallet_tier: Tier::S,
            token_symbol: "ETH".into(),
            chain_id: signal_type.is_spot().then(|| "1".to_string()),
            token_address: signal_type.is_spot().then(|| "0xtoken".to_string()),
            liquidity_usd: signal_type.is_spot().then_some(250_000.0),
            perp_platform: signal_type.is_perp().then(|| "hyperliquid".to_string()),
            pair: signal_type.is_perp().then(|| "ETH-PERP".to_string()),
            leverage: signal_type.is_perp().then_some(5.0),
            price,
            size_usd: 75_000.0,
            created_at: Utc::now(),
        }
    }

    fn assemble(signals: &[Signal]) -> Option<Alert> {
        let resolutions = ConfluenceResolver::new().resolve(signals);
        assert_eq!(resolutions.len(), 1);
        AlertAssembler::new(0.01).assemble(&resolutions[0])
    }

    #[test]
    fn test_hybrid_alert_uses_latest_signals() {
        let signals = vec![
            signal(SignalType::SpotBuy, 2000.0, 80.0),
            signal(SignalType::SpotBuy, 2010.0, 81.0),
            signal(SignalType::PerpOpenLong, 2020.0, 82.0),
        ];
        let alert = assemble(&signals).unwrap();

        assert_eq!(alert.alert_type, AlertType::Hybrid);
        assert_eq!(alert.signal_strength, SignalStrength::Strong);
        assert_eq!(alert.mode, Mode::Long);
        assert_eq!(alert.wallet_score, 82.0);
        assert_eq!(alert.spot.as_ref().unwrap().price, 2010.0);
        assert_eq!(alert.perp.as_ref().unwrap().entry_price, 2020.0);
        assert_eq!(alert.perp.as_ref().unwrap().leverage, Some(5.0));
        assert_eq!(alert.setup.mode, SetupMode::Long);
        assert!((alert.setup.entry_min - 2020.0 * 0.995).abs() < 1e-9);
    }

    #[test]
    fn test_spot_only_exit() {
        let alert = assemble(&[signal(SignalType::SpotSell, 3.0, 70.0)]).unwrap();
        assert_eq!(alert.alert_type, AlertType::SpotOnly);
        assert_eq!(alert.mode, Mode::Exit);
        assert!(alert.perp.is_none());
        assert_eq!(alert.setup.stop_loss, 3.0);
    }

    #[test]
    fn test_mixed_produces_no_alert() {
        let signals = vec![
            signal(SignalType::SpotBuy, 10.0, 90.0),
            signal(SignalType::PerpOpenShort, 10.0, 90.0),
        ];
        assert!(assemble(&signals).is_none());
    }

    #[test]
    fn test_raw_payload_contents() {
        let alert = assemble(&[signal(SignalType::PerpOpenShort, 50.0, 77.0)]).unwrap();
        assert_eq!(alert.alert_type, AlertType::PerpOnly);
        assert_eq!(alert.raw_payload["wallet_address"], "0xaa");
        assert_eq!(alert.raw_payload["wallet_score"], 77.0);
        assert_eq!(alert.raw_payload["spot_bias"], 0);
        assert_eq!(alert.raw_payload["perp_bias"], -1);
        assert_eq!(alert.raw_payload["mode"], "PERP_SHORT");
    }
}
