use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Totals moved to and from one counterparty for one asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFlow {
    pub sent: Decimal,
    pub received: Decimal,
}

impl AssetFlow {
    pub fn net(&self) -> Decimal {
        self.received - self.sent
    }

    pub fn is_zero(&self) -> bool {
        self.sent.is_zero() && self.received.is_zero()
    }
}

/// Everything the subject exchanged with one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartySummary {
    pub address: String,
    pub total_transactions: usize,
    /// Keyed by asset symbol; assets with nothing sent or received are omitted
    pub assets: BTreeMap<String, AssetFlow>,
}

impl CounterpartySummary {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            total_transactions: 0,
            assets: BTreeMap::new(),
        }
    }

    pub fn flow(&self, symbol: &str) -> AssetFlow {
        self.assets.get(symbol).copied().unwrap_or_default()
    }

    pub fn net(&self, symbol: &str) -> Decimal {
        self.flow(symbol).net()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_is_received_minus_sent() {
        let flow = AssetFlow {
            sent: Decimal::new(25, 1),
            received: Decimal::new(10, 0),
        };
        assert_eq!(flow.net(), Decimal::new(75, 1));
        assert!(!flow.is_zero());
        assert!(AssetFlow::default().is_zero());
    }

    #[test]
    fn missing_asset_reads_as_zero() {
        let summary = CounterpartySummary::new("0xbb");
        assert_eq!(summary.net("ETH"), Decimal::ZERO);
    }
}
