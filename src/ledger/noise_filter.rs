//! Drops zero-value native transfers that only exist because a token transfer
//! was made through a contract call.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::LedgerError;
use crate::models::{AssetCategory, Network, NormalizedTransaction};
use crate::utils::helper::address_key;

/// How a zero-value native record is matched to the token transfer behind it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoiseRule {
    /// A token record exists in the same second. Coarse: two unrelated
    /// transfers in one second are conflated, and a token event stamped a
    /// second apart is missed.
    #[default]
    SameTimestamp,
    /// A token record carries the same transaction hash
    SameHash,
}

impl FromStr for NoiseRule {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" | "same_timestamp" => Ok(NoiseRule::SameTimestamp),
            "hash" | "same_hash" => Ok(NoiseRule::SameHash),
            other => Err(LedgerError::Config(format!("unknown noise rule {:?}", other))),
        }
    }
}

impl fmt::Display for NoiseRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseRule::SameTimestamp => write!(f, "timestamp"),
            NoiseRule::SameHash => write!(f, "hash"),
        }
    }
}

/// Filter with the default same-second rule
pub fn filter(records: Vec<NormalizedTransaction>, network: Network) -> Vec<NormalizedTransaction> {
    filter_with(records, network, NoiseRule::default())
}

pub fn filter_with(
    records: Vec<NormalizedTransaction>,
    network: Network,
    rule: NoiseRule,
) -> Vec<NormalizedTransaction> {
    let token_seconds: HashSet<i64> = records
        .iter()
        .filter(|tx| tx.category == AssetCategory::Token)
        .map(|tx| tx.timestamp)
        .collect();
    let token_hashes: HashSet<String> = records
        .iter()
        .filter(|tx| tx.category == AssetCategory::Token)
        .filter_map(|tx| tx.hash.as_deref().map(address_key))
        .collect();

    let before = records.len();
    let kept: Vec<NormalizedTransaction> = records
        .into_iter()
        .filter(|tx| {
            if !tx.is_native_asset() || !tx.amount.is_zero() {
                return true;
            }
            let artifact = match rule {
                NoiseRule::SameTimestamp => token_seconds.contains(&tx.timestamp),
                NoiseRule::SameHash => tx
                    .hash
                    .as_deref()
                    .map(|h| token_hashes.contains(&address_key(h)))
                    .unwrap_or(false),
            };
            if artifact {
                debug!("Dropping zero-value {} record {:?} ({} rule)", tx.asset_symbol, tx.hash, rule);
            }
            !artifact
        })
        .collect();

    debug!("Noise filter on {}: kept {} of {} records", network, kept.len(), before);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn tx(hash: &str, ts: i64, category: AssetCategory, symbol: &str, amount: i64) -> NormalizedTransaction {
        NormalizedTransaction {
            hash: Some(hash.into()),
            block_height: None,
            timestamp: ts,
            from: "0xaa".into(),
            to: "0xbb".into(),
            raw_amount: amount.to_string(),
            amount: Decimal::from(amount),
            decimals: 0,
            asset_symbol: symbol.into(),
            category,
            network: Network::Ethereum,
            gas_price: None,
            gas_used: None,
        }
    }

    fn hashes(records: &[NormalizedTransaction]) -> Vec<&str> {
        records.iter().filter_map(|t| t.hash.as_deref()).collect()
    }

    #[test]
    fn drops_zero_native_sharing_a_token_second() {
        let records = vec![
            tx("call", 100, AssetCategory::Native, "ETH", 0),
            tx("token", 100, AssetCategory::Token, "USDT", 5),
            tx("lonely", 200, AssetCategory::Native, "ETH", 0),
        ];
        let kept = filter(records, Network::Ethereum);
        assert_eq!(hashes(&kept), vec!["token", "lonely"]);
    }

    #[test]
    fn keeps_non_zero_native_and_all_tokens() {
        let records = vec![
            tx("eth", 100, AssetCategory::Native, "ETH", 3),
            tx("zero-token", 100, AssetCategory::Token, "USDT", 0),
            tx("internal", 100, AssetCategory::Internal, "ETH", 1),
        ];
        let kept = filter(records, Network::Ethereum);
        assert_eq!(hashes(&kept), vec!["eth", "zero-token", "internal"]);
    }

    #[test]
    fn zero_internal_transfers_are_native_too() {
        let records = vec![
            tx("internal", 100, AssetCategory::Internal, "ETH", 0),
            tx("token", 100, AssetCategory::Token, "USDT", 1),
        ];
        assert_eq!(hashes(&filter(records, Network::Ethereum)), vec!["token"]);
    }

    #[test]
    fn hash_rule_needs_a_matching_hash() {
        let records = vec![
            tx("0xABC", 100, AssetCategory::Native, "ETH", 0),
            tx("0xdef", 100, AssetCategory::Native, "ETH", 0),
            tx("0xabc", 101, AssetCategory::Token, "USDT", 7),
        ];
        let kept = filter_with(records, Network::Ethereum, NoiseRule::SameHash);
        assert_eq!(hashes(&kept), vec!["0xdef", "0xabc"]);
    }

    #[test]
    fn rule_parsing() {
        assert_eq!("hash".parse::<NoiseRule>().unwrap(), NoiseRule::SameHash);
        assert_eq!("Timestamp".parse::<NoiseRule>().unwrap(), NoiseRule::SameTimestamp);
        assert!("nonce".parse::<NoiseRule>().is_err());
    }
}
