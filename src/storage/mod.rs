//! Persistence for wallets, signals and alerts
//!
//! Wallets are the only mutable records. Signals and alerts are append-only.
//!
//! - `MemoryStore`: in-process, for tests and dry runs
//! - `JsonFileStore`: a wallet map plus JSON-lines logs under a data directory

pub mod json_file;
pub mod memory;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::confluence::alert::Alert;
use crate::error::Result;
use crate::signal::types::Signal;
use crate::wallet::types::Wallet;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait Storage: Send + Sync {
    /// All wallets keyed by normalized address
    async fn load_wallets(&self) -> Result<HashMap<String, Wallet>>;

    /// Insert or replace wallets by address
    async fn upsert_wallets(&self, wallets: &[Wallet]) -> Result<()>;

    /// Insert each wallet whose address is not stored yet, in one write.
    /// Returns the addresses that were inserted.
    async fn insert_wallets_if_absent(&self, wallets: Vec<Wallet>) -> Result<Vec<String>>;

    /// Insert a wallet unless one with the same address exists.
    /// Returns true if it was inserted.
    async fn insert_wallet_if_absent(&self, wallet: Wallet) -> Result<bool> {
        Ok(!self.insert_wallets_if_absent(vec![wallet]).await?.is_empty())
    }

    async fn append_signals(&self, signals: &[Signal]) -> Result<()>;

    async fn append_alerts(&self, alerts: &[Alert]) -> Result<()>;
}
