//! Trade setup pricing
//!
//! Derives an entry band, stop-loss and three take-profit levels from a
//! resolved mode and a reference price.

use serde::{Deserialize, Serialize};

use super::resolver::Mode;

/// Direction of a setup, collapsed from the resolver mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SetupMode {
    Long,
    Short,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    Spot,
    Perp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub mode: SetupMode,
    pub market: Market,
    pub entry_min: f64,
    pub entry_max: f64,
    pub stop_loss: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
    pub suggested_risk_per_trade: f64,
}

const ENTRY_BAND: (f64, f64) = (0.995, 1.005);
const LONG_STOP: f64 = 0.90;
const LONG_TARGETS: [f64; 3] = [1.05, 1.15, 1.30];
const SHORT_STOP: f64 = 1.10;
const SHORT_TARGETS: [f64; 3] = [0.95, 0.85, 0.70];
const PLACEHOLDER_PRICE: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct SetupGenerator;

impl SetupGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn setup(&self, mode: Mode, reference_price: f64, risk_per_trade: f64) -> TradeSetup {
        let price = if reference_price.is_finite() && reference_price > 0.0 {
            reference_price
        } else {
            PLACEHOLDER_PRICE
        };

        let market = match mode {
            Mode::SpotLong | Mode::Exit => Market::Spot,
            _ => Market::Perp,
        };

        let name = mode.as_str();
        let (setup_mode, stop, targets) = if name.contains("LONG") {
            (SetupMode::Long, LONG_STOP, LONG_TARGETS)
        } else if name.contains("SHORT") {
            (SetupMode::Short, SHORT_STOP, SHORT_TARGETS)
        } else {
            return TradeSetup {
                mode: SetupMode::None,
                market,
                entry_min: price,
                entry_max: price,
                stop_loss: price,
                tp1: price,
                tp2: price,
                tp3: price,
                suggested_risk_per_trade: risk_per_trade,
            };
        };

        TradeSetup {
            mode: setup_mode,
            market,
            entry_min: price * ENTRY_BAND.0,
            entry_max: price * ENTRY_BAND.1,
            stop_loss: price * stop,
            tp1: price * targets[0],
            tp2: price * targets[1],
            tp3: price * targets[2],
            suggested_risk_per_trade: risk_per_trade,
        }
    }
}
