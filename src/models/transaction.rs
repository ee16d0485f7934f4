use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::asset::AssetCategory;
use super::network::Network;
use crate::ledger::normalizer;
use crate::utils::helper::same_address;

/// Transfer as reported by an explorer, before any normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransferRecord {
    pub hash: Option<String>,
    pub block_height: Option<u64>,
    /// Unix seconds
    pub timestamp: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Integer amount in the asset's smallest unit, kept as text
    pub raw_amount: Option<String>,
    pub asset_symbol: String,
    pub category: AssetCategory,
    pub network: Network,
    pub gas_price: Option<String>,
    pub gas_used: Option<String>,
    /// Decimals stated by the token contract, overrides the category default
    pub decimals: Option<u32>,
    /// The provider reported the transaction as reverted
    #[serde(default)]
    pub failed: bool,
}

impl RawTransferRecord {
    /// Empty record for one asset; adapters fill in the provider fields
    pub fn new(network: Network, category: AssetCategory, asset_symbol: impl Into<String>) -> Self {
        Self {
            hash: None,
            block_height: None,
            timestamp: None,
            from: None,
            to: None,
            raw_amount: None,
            asset_symbol: asset_symbol.into(),
            category,
            network,
            gas_price: None,
            gas_used: None,
            decimals: None,
            failed: false,
        }
    }

    /// Hash for diagnostics, even when the provider omitted it
    pub fn display_hash(&self) -> &str {
        self.hash.as_deref().unwrap_or("<unknown>")
    }
}

/// Transfer with its amount scaled to human units and the symbol canonicalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub hash: Option<String>,
    pub block_height: Option<u64>,
    pub timestamp: i64,
    pub from: String,
    pub to: String,
    pub raw_amount: String,
    /// Magnitude only; direction is applied by the ledger builder
    pub amount: Decimal,
    pub decimals: u32,
    pub asset_symbol: String,
    pub category: AssetCategory,
    pub network: Network,
    pub gas_price: Option<String>,
    pub gas_used: Option<String>,
}

impl NormalizedTransaction {
    pub fn is_native_asset(&self) -> bool {
        self.category.is_native_asset()
    }

    /// Network fee paid in the native coin, when both gas fields are present.
    /// Informational only: fees are not part of the running balance.
    pub fn fee(&self) -> Option<Decimal> {
        let price = self.gas_price.as_deref()?;
        let used = self.gas_used.as_deref()?;
        let price = normalizer::parse_raw_amount(price).ok()?;
        let used = normalizer::parse_raw_amount(used).ok()?;
        let fee = price.checked_mul(used)?;
        normalizer::scale_down(fee, self.network.native_decimals()).ok()
    }
}

/// Side of the transfer relative to the subject address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// `out` exactly when the subject is the sender
    pub fn relative_to(from: &str, subject: &str) -> Self {
        if same_address(from, subject) {
            Direction::Out
        } else {
            Direction::In
        }
    }

    pub fn apply(&self, amount: Decimal) -> Decimal {
        match self {
            Direction::In => amount,
            Direction::Out => -amount,
        }
    }
}

/// One row of the ordered ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub transaction: NormalizedTransaction,
    pub direction: Direction,
    /// Balance of this entry's asset after applying it
    pub running_balance: Decimal,
    pub human_time: String,
}

impl LedgerEntry {
    pub fn asset_symbol(&self) -> &str {
        &self.transaction.asset_symbol
    }

    pub fn signed_amount(&self) -> Decimal {
        self.direction.apply(self.transaction.amount)
    }

    /// Address on the other side of the transfer
    pub fn counterparty(&self) -> &str {
        match self.direction {
            Direction::Out => &self.transaction.to,
            Direction::In => &self.transaction.from,
        }
    }
}
