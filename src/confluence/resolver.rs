//! Spot/perp confluence resolution
//!
//! Each (wallet, asset) group gets a spot bias and a perp bias from its net
//! signal counts; the pair is mapped to a strength and mode through a fixed
//! decision table.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::events::grouper::GroupKey;
use crate::signal::types::{Signal, SignalType};

/// Net direction of a signal sub-group: -1 / 0 / +1 on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Bias {
    Bearish,
    Neutral,
    Bullish,
}

impl Bias {
    /// +1 if `up > down`, -1 if `up < down`, else 0
    pub fn from_counts(up: usize, down: usize) -> Self {
        match up.cmp(&down) {
            std::cmp::Ordering::Greater => Bias::Bullish,
            std::cmp::Ordering::Less => Bias::Bearish,
            std::cmp::Ordering::Equal => Bias::Neutral,
        }
    }

    pub fn value(&self) -> i8 {
        match self {
            Bias::Bearish => -1,
            Bias::Neutral => 0,
            Bias::Bullish => 1,
        }
    }
}

impl From<Bias> for i8 {
    fn from(bias: Bias) -> Self {
        bias.value()
    }
}

impl TryFrom<i8> for Bias {
    type Error = String;

    fn try_from(value: i8) -> std::result::Result<Self, Self::Error> {
        match value {
            -1 => Ok(Bias::Bearish),
            0 => Ok(Bias::Neutral),
            1 => Ok(Bias::Bullish),
            other => Err(format!("bias must be -1, 0 or 1, got {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStrength {
    Strong,
    Normal,
    Weak,
    Avoid,
}

/// Resolved trade mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Long,
    Short,
    SpotLong,
    PerpLong,
    Exit,
    PerpShort,
    Mixed,
    None,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Long => "LONG",
            Mode::Short => "SHORT",
            Mode::SpotLong => "SPOT_LONG",
            Mode::PerpLong => "PERP_LONG",
            Mode::Exit => "EXIT",
            Mode::PerpShort => "PERP_SHORT",
            Mode::Mixed => "MIXED",
            Mode::None => "NONE",
        }
    }

    /// Conflicting or absent evidence; never alerted
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Mode::Mixed | Mode::None)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision table over (spot_bias, perp_bias). Total: every pair maps.
pub fn decide(spot_bias: Bias, perp_bias: Bias) -> (SignalStrength, Mode) {
    use Bias::*;

    match (spot_bias, perp_bias) {
        (Bullish, Bullish) => (SignalStrength::Strong, Mode::Long),
        (Bearish, Bearish) => (SignalStrength::Strong, Mode::Short),
        (Bullish, Neutral) => (SignalStrength::Normal, Mode::SpotLong),
        (Neutral, Bullish) => (SignalStrength::Normal, Mode::PerpLong),
        (Bearish, Neutral) => (SignalStrength::Normal, Mode::Exit),
        (Neutral, Bearish) => (SignalStrength::Normal, Mode::PerpShort),
        (Bullish, Bearish) | (Bearish, Bullish) => (SignalStrength::Avoid, Mode::Mixed),
        (Neutral, Neutral) => (SignalStrength::Weak, Mode::None),
    }
}

/// Outcome for one (wallet, asset) group
#[derive(Debug, Clone)]
pub struct Resolution {
    pub key: GroupKey,
    /// Group signals in creation order
    pub signals: Vec<Signal>,
    pub spot_bias: Bias,
    pub perp_bias: Bias,
    pub strength: SignalStrength,
    pub mode: Mode,
}

impl Resolution {
    pub fn spot_signals(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(|s| s.signal_type.is_spot())
    }

    pub fn perp_signals(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(|s| s.signal_type.is_perp())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfluenceResolver;

impl ConfluenceResolver {
    pub fn new() -> Self {
        Self
    }

    /// Biases and decision for one group of signals
    pub fn resolve_group(&self, signals: &[Signal]) -> (SignalStrength, Mode, Bias, Bias) {
        let count = |t: SignalType| signals.iter().filter(|s| s.signal_type == t).count();

        let spot_bias = Bias::from_counts(count(SignalType::SpotBuy), count(SignalType::SpotSell));
        let perp_bias = Bias::from_counts(count(SignalType::PerpOpenLong), count(SignalType::PerpOpenShort));
        let (strength, mode) = decide(spot_bias, perp_bias);

        (strength, mode, spot_bias, perp_bias)
    }

    /// Regroup signals by (wallet, asset) and resolve every group
    pub fn resolve(&self, signals: &[Signal]) -> Vec<Resolution> {
        let mut groups: BTreeMap<GroupKey, Vec<Signal>> = BTreeMap::new();
        for signal in signals {
            groups
                .entry(GroupKey::new(&signal.wallet_address, &signal.token_symbol))
                .or_default()
                .push(signal.clone());
        }

        groups
            .into_iter()
            .map(|(key, signals)| {
                let (strength, mode, spot_bias, perp_bias) = self.resolve_group(&signals);
                Resolution {
                    key,
                    signals,
                    spot_bias,
                    perp_bias,
                    strength,
                    mode,
                }
            })
            .collect()
    }
}
