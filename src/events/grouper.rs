//! Partition event batches by (wallet, asset)

use std::collections::BTreeMap;

use tracing::warn;

use crate::events::types::{PerpEvent, SpotEvent};
use crate::wallet::types::normalize_address;

/// Grouping key: lowercase wallet address and asset symbol
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub wallet_address: String,
    pub asset: String,
}

impl GroupKey {
    pub fn new(wallet_address: &str, asset: &str) -> Self {
        Self {
            wallet_address: normalize_address(wallet_address),
            asset: asset.to_string(),
        }
    }
}

/// Events for one (wallet, asset), in input order
#[derive(Debug, Clone, Default)]
pub struct EventGroup {
    pub spot: Vec<SpotEvent>,
    pub perp: Vec<PerpEvent>,
}

impl EventGroup {
    pub fn len(&self) -> usize {
        self.spot.len() + self.perp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spot.is_empty() && self.perp.is_empty()
    }
}

pub type GroupedEvents = BTreeMap<GroupKey, EventGroup>;

/// Group spot events by token symbol and perp events by pair base symbol.
///
/// Events without a wallet address are dropped.
pub fn group_events(spot_events: &[SpotEvent], perp_events: &[PerpEvent]) -> GroupedEvents {
    let mut groups = GroupedEvents::new();

    for event in spot_events {
        if event.wallet_address.trim().is_empty() {
            warn!(tx = %event.tx_hash, "Dropping spot event without wallet address");
            continue;
        }
        groups
            .entry(GroupKey::new(&event.wallet_address, &event.token_symbol))
            .or_default()
            .spot
            .push(event.clone());
    }

    for event in perp_events {
        if event.wallet_address.trim().is_empty() {
            warn!(pair = %event.pair, "Dropping perp event without wallet address");
            continue;
        }
        groups
            .entry(GroupKey::new(&event.wallet_address, event.symbol()))
            .or_default()
            .perp
            .push(event.clone());
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::{Direction, PerpEventType, Side};

    fn spot(wallet: &str, symbol: &str, tx: &str) -> SpotEvent {
        SpotEvent {
            wallet_address: wallet.into(),
            chain_id: "1".into(),
            dex: "uniswap_v2".into(),
            tx_hash: tx.into(),
            timestamp: 1_700_000_000,
            token_address: "0xtoken".into(),
            token_symbol: symbol.into(),
            side: Side::Buy,
            amount_usd: 1_000.0,
            price: 1.0,
            liquidity_usd: 50_000.0,
        }
    }

    fn perp(wallet: &str, pair: &str, size: f64) -> PerpEvent {
        PerpEvent {
            wallet_address: wallet.into(),
            platform: "hyperliquid".into(),
            pair: pair.into(),
            direction: Direction::Long,
            event_type: PerpEventType::Open,
            entry_price: 1.0,
            size_usd: size,
            leverage: 3.0,
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_spot_and_perp_share_asset_bucket() {
        let groups = group_events(
            &[spot("0xAA", "BTC", "t1")],
            &[perp("0xaa", "BTC-PERP", 1.0)],
        );
        assert_eq!(groups.len(), 1);
        let group = &groups[&GroupKey::new("0xaa", "BTC")];
        assert_eq!(group.spot.len(), 1);
        assert_eq!(group.perp.len(), 1);
    }

    #[test]
    fn test_preserves_input_order() {
        let groups = group_events(
            &[spot("0xaa", "ETH", "t1"), spot("0xbb", "ETH", "x"), spot("0xaa", "ETH", "t2")],
            &[perp("0xaa", "ETH-PERP", 1.0), perp("0xaa", "ETH-USD", 2.0)],
        );
        assert_eq!(groups.len(), 2);

        let group = &groups[&GroupKey::new("0xaa", "ETH")];
        let txs: Vec<_> = group.spot.iter().map(|e| e.tx_hash.as_str()).collect();
        assert_eq!(txs, vec!["t1", "t2"]);
        let sizes: Vec<_> = group.perp.iter().map(|e| e.size_usd).collect();
        assert_eq!(sizes, vec![1.0, 2.0]);
    }

    #[test]
    fn test_drops_blank_wallets() {
        let groups = group_events(&[spot("  ", "ETH", "t1")], &[perp("", "ETH-PERP", 1.0)]);
        assert!(groups.is_empty());
    }
}
