//! Smart Money Engine Library
//!
//! Scores and tiers a wallet population, turns qualifying wallet activity
//! into signals, and fuses spot and perp signals per (wallet, asset) into
//! confluence alerts with a suggested trade setup.

pub mod cli;
pub mod config;
pub mod confluence;
pub mod engine;
pub mod error;
pub mod events;
pub mod notify;
pub mod signal;
pub mod storage;
pub mod wallet;

// Re-export commonly used types
pub use config::Config;
pub use engine::{CycleReport, Engine};
pub use error::{Error, Result};
