//! In-memory store

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::Storage;
use crate::confluence::alert::Alert;
use crate::error::Result;
use crate::signal::types::Signal;
use crate::wallet::types::Wallet;

#[derive(Debug, Default)]
pub struct MemoryStore {
    wallets: DashMap<String, Wallet>,
    signals: RwLock<Vec<Signal>>,
    alerts: RwLock<Vec<Alert>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store
    pub fn with_wallets(wallets: impl IntoIterator<Item = Wallet>) -> Self {
        let store = Self::new();
        for wallet in wallets {
            store.wallets.insert(wallet.address.clone(), wallet);
        }
        store
    }

    pub fn wallet(&self, address: &str) -> Option<Wallet> {
        self.wallets.get(address).map(|w| w.value().clone())
    }

    pub fn wallet_count(&self) -> usize {
        self.wallets.len()
    }

    pub async fn signals(&self) -> Vec<Signal> {
        self.signals.read().await.clone()
    }

    pub async fn alerts(&self) -> Vec<Alert> {
        self.alerts.read().await.clone()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn load_wallets(&self) -> Result<HashMap<String, Wallet>> {
        Ok(self
            .wallets
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect())
    }

    async fn upsert_wallets(&self, wallets: &[Wallet]) -> Result<()> {
        for wallet in wallets {
            self.wallets.insert(wallet.address.clone(), wallet.clone());
        }
        Ok(())
    }

    async fn insert_wallets_if_absent(&self, wallets: Vec<Wallet>) -> Result<Vec<String>> {
        let mut inserted = Vec::new();
        for wallet in wallets {
            let address = wallet.address.clone();
            self.wallets.entry(address.clone()).or_insert_with(|| {
                inserted.push(address);
                wallet
            });
        }
        Ok(inserted)
    }

    async fn append_signals(&self, signals: &[Signal]) -> Result<()> {
        self.signals.write().await.extend_from_slice(signals);
        Ok(())
    }

    async fn append_alerts(&self, alerts: &[Alert]) -> Result<()> {
        self.alerts.write().await.extend_from_slice(alerts);
        Ok(())
    }
}
