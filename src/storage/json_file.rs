//! JSON file store
//!
//! Layout under the data directory:
//!
//! - `wallets.json`: address → wallet map, rewritten on every upsert
//!
//! Wallet writes update the in-memory map only after the file write succeeds.
//! - `signals.jsonl`: one signal per line, appended
//! - `alerts.jsonl`: one alert per line, appended

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::Storage;
use crate::confluence::alert::Alert;
use crate::error::{Error, Result};
use crate::signal::types::Signal;
use crate::wallet::types::Wallet;

const WALLETS_FILE: &str = "wallets.json";
const SIGNALS_FILE: &str = "signals.jsonl";
const ALERTS_FILE: &str = "alerts.jsonl";

#[derive(Debug)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    wallets: RwLock<HashMap<String, Wallet>>,
}

impl JsonFileStore {
    /// Open the store, creating the directory and loading existing wallets
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| Error::Storage(format!("create {}: {}", data_dir.display(), e)))?;

        let wallets_path = data_dir.join(WALLETS_FILE);
        let wallets: HashMap<String, Wallet> = if wallets_path.exists() {
            let data = tokio::fs::read_to_string(&wallets_path)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;
            serde_json::from_str(&data).map_err(|e| Error::Storage(e.to_string()))?
        } else {
            HashMap::new()
        };

        info!(
            path = %data_dir.display(),
            wallets = wallets.len(),
            "Opened JSON store"
        );

        Ok(Self {
            data_dir,
            wallets: RwLock::new(wallets),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn save_wallets(&self, wallets: &HashMap<String, Wallet>) -> Result<()> {
        let path = self.data_dir.join(WALLETS_FILE);
        let data = serde_json::to_string_pretty(wallets).map_err(|e| Error::Storage(e.to_string()))?;

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        debug!("Saved {} wallets to {}", wallets.len(), path.display());
        Ok(())
    }

    async fn append_lines<T: Serialize>(&self, file: &str, records: &[T]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut buf = String::new();
        for record in records {
            buf.push_str(&serde_json::to_string(record).map_err(|e| Error::Storage(e.to_string()))?);
            buf.push('\n');
        }

        let path = self.data_dir.join(file);
        let mut handle = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| Error::Storage(format!("open {}: {}", path.display(), e)))?;

        handle
            .write_all(buf.as_bytes())
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        handle.flush().await.map_err(|e| Error::Storage(e.to_string()))?;

        debug!("Appended {} records to {}", records.len(), path.display());
        Ok(())
    }
}

#[async_trait]
impl Storage for JsonFileStore {
    async fn load_wallets(&self) -> Result<HashMap<String, Wallet>> {
        Ok(self.wallets.read().await.clone())
    }

    async fn upsert_wallets(&self, wallets: &[Wallet]) -> Result<()> {
        let mut guard = self.wallets.write().await;
        let mut next = guard.clone();
        for wallet in wallets {
            next.insert(wallet.address.clone(), wallet.clone());
        }
        self.save_wallets(&next).await?;
        *guard = next;
        Ok(())
    }

    async fn insert_wallets_if_absent(&self, wallets: Vec<Wallet>) -> Result<Vec<String>> {
        let mut guard = self.wallets.write().await;
        let mut next = guard.clone();
        let mut inserted = Vec::new();
        for wallet in wallets {
            if !next.contains_key(&wallet.address) {
                inserted.push(wallet.address.clone());
                next.insert(wallet.address.clone(), wallet);
            }
        }
        if inserted.is_empty() {
            return Ok(inserted);
        }

        self.save_wallets(&next).await?;
        *guard = next;
        Ok(inserted)
    }

    async fn append_signals(&self, signals: &[Signal]) -> Result<()> {
        self.append_lines(SIGNALS_FILE, signals).await
    }

    async fn append_alerts(&self, alerts: &[Alert]) -> Result<()> {
        self.append_lines(ALERTS_FILE, alerts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::types::SignalType;
    use crate::wallet::types::Tier;
    use chrono::Utc;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn signal(wallet: &str) -> Signal {
        Signal {
            id: Uuid::new_v4(),
            signal_type: SignalType::SpotBuy,
            wallet_address: wallet.into(),
            wallet_score: 70.0,
            wallet_tier: Tier::A,
            token_symbol: "PEPE".into(),
            chain_id: Some("1".into()),
            token_address: Some("0xtoken".into()),
            liquidity_usd: Some(1_000_000.0),
            perp_platform: None,
            pair: None,
            leverage: None,
            price: 0.0001,
            size_usd: 8_000.0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_wallets_survive_reopen() {
        let dir = TempDir::new().unwrap();

        let store = JsonFileStore::open(dir.path()).await.unwrap();
        let mut wallet = Wallet::new("0xAbC");
        wallet.tier = Tier::B;
        store.upsert_wallets(&[wallet]).await.unwrap();
        assert!(store.insert_wallet_if_absent(Wallet::new("0xdef")).await.unwrap());
        assert!(!store.insert_wallet_if_absent(Wallet::new("0xabc")).await.unwrap());
        drop(store);

        let reopened = JsonFileStore::open(dir.path()).await.unwrap();
        let wallets = reopened.load_wallets().await.unwrap();
        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets["0xabc"].tier, Tier::B);
    }

    #[tokio::test]
    async fn test_signals_are_appended_as_lines() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("nested")).await.unwrap();

        store.append_signals(&[signal("0xaa")]).await.unwrap();
        store.append_signals(&[signal("0xbb"), signal("0xcc")]).await.unwrap();
        store.append_alerts(&[]).await.unwrap();

        let data = std::fs::read_to_string(store.data_dir().join(SIGNALS_FILE)).unwrap();
        let lines: Vec<Signal> = data
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].wallet_address, "0xcc");
        assert!(!store.data_dir().join(ALERTS_FILE).exists());
    }

    #[tokio::test]
    async fn test_batch_insert_writes_once_and_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        let mut known = Wallet::new("0xabc");
        known.tier = Tier::S;
        store.upsert_wallets(&[known]).await.unwrap();

        let inserted = store
            .insert_wallets_if_absent(vec![Wallet::new("0xabc"), Wallet::new("0xdef"), Wallet::new("0x123")])
            .await
            .unwrap();
        assert_eq!(inserted, vec!["0xdef".to_string(), "0x123".to_string()]);

        // Nothing new: the file is left untouched
        std::fs::remove_file(dir.path().join(WALLETS_FILE)).unwrap();
        assert!(store
            .insert_wallets_if_absent(vec![Wallet::new("0xdef")])
            .await
            .unwrap()
            .is_empty());
        assert!(!dir.path().join(WALLETS_FILE).exists());

        store.insert_wallet_if_absent(Wallet::new("0x456")).await.unwrap();
        drop(store);

        let wallets = JsonFileStore::open(dir.path()).await.unwrap().load_wallets().await.unwrap();
        assert_eq!(wallets.len(), 4);
        assert_eq!(wallets["0xabc"].tier, Tier::S);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_wallets_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        store.upsert_wallets(&[Wallet::new("0xabc")]).await.unwrap();

        // A directory in place of the wallet file makes every save fail
        std::fs::remove_file(dir.path().join(WALLETS_FILE)).unwrap();
        std::fs::create_dir(dir.path().join(WALLETS_FILE)).unwrap();

        let mut changed = Wallet::new("0xabc");
        changed.tier = Tier::S;
        let err = store.upsert_wallets(&[changed]).await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));

        let err = store
            .insert_wallets_if_absent(vec![Wallet::new("0xdef")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));

        let wallets = store.load_wallets().await.unwrap();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets["0xabc"].tier, Tier::Ignore);
    }

    #[tokio::test]
    async fn test_corrupt_wallet_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(WALLETS_FILE), "not json").unwrap();

        let err = JsonFileStore::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
