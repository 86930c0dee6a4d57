//! Alert delivery
//!
//! The engine hands every alert to exactly one sink. Message rendering and
//! chat delivery live outside this crate; sinks here either log the alert or
//! forward it to another task.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use crate::confluence::alert::Alert;
use crate::error::{Error, Result};

#[async_trait]
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, alert: &Alert) -> Result<()>;
}

/// Writes each alert as a structured tracing event
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, alert: &Alert) -> Result<()> {
        info!(
            alert_id = %alert.id,
            wallet = %alert.wallet_address,
            label = alert.wallet_label.as_deref().unwrap_or("-"),
            asset = %alert.token_symbol,
            alert_type = ?alert.alert_type,
            strength = ?alert.signal_strength,
            mode = %alert.mode,
            score = alert.wallet_score,
            entry_min = alert.setup.entry_min,
            entry_max = alert.setup.entry_max,
            stop_loss = alert.setup.stop_loss,
            tp1 = alert.setup.tp1,
            tp2 = alert.setup.tp2,
            tp3 = alert.setup.tp3,
            "ALERT"
        );
        Ok(())
    }
}

/// Forwards alerts to a receiver owned by another task
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Alert>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Alert>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Alert>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl AlertSink for ChannelSink {
    fn name(&self) -> &str {
        "channel"
    }

    async fn deliver(&self, alert: &Alert) -> Result<()> {
        self.tx
            .send(alert.clone())
            .await
            .map_err(|_| Error::Notification("alert receiver dropped".into()))
    }
}
