//! Wallet reputation module
//!
//! Scores every tracked wallet from its aggregate performance and buckets
//! the population into tiers:
//! - Smart score (ROI, equity, PnL)
//! - Rank-based tier assignment (S / A / B / ignore)
//! - Leaderboard discovery and tracked-wallet seeding
//!
//! # Architecture
//!
//! ```text
//! WalletMetrics → ScoreEngine → score ─┐
//!                                      ├→ TierAssigner → Tier
//!        (whole population, ranked) ───┘
//! ```

pub mod discovery;
pub mod scoring;
pub mod tiering;
pub mod types;

pub use discovery::{parse_leaderboard, DiscoveryConfig, LeaderboardEntry, TrackedRegistry, TrackedWallet};
pub use scoring::{ScoreEngine, SmartScore};
pub use tiering::{TierAssigner, TierConfig};
pub use types::{normalize_address, Tier, Wallet, WalletMetrics};
