//! Configuration loading and validation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::signal::{PerpEligibilityPolicy, SignalFilterConfig};
use crate::wallet::{DiscoveryConfig, TierConfig, TrackedWallet};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub tiering: TierConfig,
    #[serde(default)]
    pub signals: SignalsConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub tracked_wallets: Vec<TrackedWallet>,
}

/// Size thresholds and default risk
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    /// Minimum spot trade size in USD (inclusive)
    #[serde(default = "default_min_spot_size_usd")]
    pub min_spot_size_usd: f64,

    /// Minimum perp position size in USD (inclusive)
    #[serde(default = "default_min_perp_size_usd")]
    pub min_perp_size_usd: f64,

    /// Fraction of equity risked per suggested setup
    #[serde(default = "default_risk_per_trade")]
    pub risk_per_trade_default: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            min_spot_size_usd: default_min_spot_size_usd(),
            min_perp_size_usd: default_min_perp_size_usd(),
            risk_per_trade_default: default_risk_per_trade(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalsConfig {
    /// Which wallet tiers may emit perp signals
    #[serde(default)]
    pub perp_eligibility: PerpEligibilityPolicy,
}

/// Cycle loop settings
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Delay between cycles
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,

    /// Re-read the config file at each cycle boundary
    #[serde(default)]
    pub reload_config: bool,

    /// Stop after this many cycles (unbounded when unset)
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: default_cycle_interval_secs(),
            reload_config: false,
            max_cycles: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    #[default]
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the JSON backend
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    #[default]
    Log,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub sink: SinkKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Knobs consumed by one processing cycle
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub signals: SignalFilterConfig,
    pub tiering: TierConfig,
    pub risk_per_trade_default: f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Config::default().core()
    }
}

fn default_min_spot_size_usd() -> f64 {
    5_000.0
}

fn default_min_perp_size_usd() -> f64 {
    50_000.0
}

fn default_risk_per_trade() -> f64 {
    0.01
}

fn default_cycle_interval_secs() -> u64 {
    5
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_log_filter() -> String {
    "smartmoney=info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix SMARTMONEY__)
            .add_source(
                config::Environment::with_prefix("SMARTMONEY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Tier fractions
        let t = &self.tiering;
        for (name, value) in [("frac_s", t.frac_s), ("frac_a", t.frac_a), ("frac_b", t.frac_b)] {
            if !(value > 0.0 && value <= 1.0) {
                anyhow::bail!("tiering.{} must be in (0, 1], got {}", name, value);
            }
        }
        if !(t.frac_s < t.frac_a && t.frac_a < t.frac_b) {
            anyhow::bail!(
                "tier fractions must be ordered frac_s < frac_a < frac_b, got {} / {} / {}",
                t.frac_s,
                t.frac_a,
                t.frac_b
            );
        }
        if !t.min_wallet_score.is_finite() || t.min_wallet_score < 0.0 {
            anyhow::bail!("tiering.min_wallet_score must be non-negative");
        }

        // Size thresholds
        if !self.thresholds.min_spot_size_usd.is_finite() || self.thresholds.min_spot_size_usd < 0.0 {
            anyhow::bail!("thresholds.min_spot_size_usd must be non-negative");
        }
        if !self.thresholds.min_perp_size_usd.is_finite() || self.thresholds.min_perp_size_usd < 0.0 {
            anyhow::bail!("thresholds.min_perp_size_usd must be non-negative");
        }

        let risk = self.thresholds.risk_per_trade_default;
        if !(risk > 0.0 && risk <= 1.0) {
            anyhow::bail!("thresholds.risk_per_trade_default must be in (0, 1], got {}", risk);
        }

        if self.engine.cycle_interval_secs == 0 {
            tracing::warn!("engine.cycle_interval_secs is 0 - cycles will run back to back");
        }

        // Tracked wallet addresses
        let address = regex::Regex::new(r"^0x[0-9a-fA-F]{40}$").context("Invalid address pattern")?;
        for wallet in &self.tracked_wallets {
            if !address.is_match(wallet.address.trim()) {
                anyhow::bail!("Invalid tracked wallet address: {}", wallet.address);
            }
        }

        Ok(())
    }

    /// Knobs for one processing cycle
    pub fn core(&self) -> CoreConfig {
        CoreConfig {
            signals: SignalFilterConfig {
                min_spot_size_usd: self.thresholds.min_spot_size_usd,
                min_perp_size_usd: self.thresholds.min_perp_size_usd,
                perp_eligibility: self.signals.perp_eligibility,
            },
            tiering: self.tiering.clone(),
            risk_per_trade_default: self.thresholds.risk_per_trade_default,
        }
    }

    /// Configuration rendered for display
    pub fn summary(&self) -> String {
        format!(
            r#"Configuration:
  Thresholds:
    min_spot_size: ${}
    min_perp_size: ${}
    risk_per_trade: {}
  Tiering:
    min_wallet_score: {}
    fractions (S/A/B): {} / {} / {}
  Signals:
    perp_eligibility: {}
  Engine:
    cycle_interval: {}s
    reload_config: {}
    max_cycles: {}
  Storage:
    backend: {:?}
    data_dir: {}
  Notify:
    sink: {:?}
  Discovery:
    top_n: {}
    min_account_value: ${}
  Tracked wallets: {}
"#,
            self.thresholds.min_spot_size_usd,
            self.thresholds.min_perp_size_usd,
            self.thresholds.risk_per_trade_default,
            self.tiering.min_wallet_score,
            self.tiering.frac_s,
            self.tiering.frac_a,
            self.tiering.frac_b,
            self.signals.perp_eligibility,
            self.engine.cycle_interval_secs,
            self.engine.reload_config,
            self.engine
                .max_cycles
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unbounded".to_string()),
            self.storage.backend,
            self.storage.data_dir,
            self.notify.sink,
            self.discovery.top_n,
            self.discovery.min_account_value,
            self.tracked_wallets.len(),
        )
    }
}
