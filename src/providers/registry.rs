use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LedgerError;
use crate::models::{Network, TokenContract};
use crate::traits::token_registry::TokenRegistry;
use crate::Result;

/// Tether on Ethereum mainnet
pub const ETH_USDT_CONTRACT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";
/// Tether on Tron mainnet
pub const TRON_USDT_CONTRACT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

/// Token row as stored by the address registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry {
    pub network: Network,
    #[serde(alias = "token_name")]
    pub symbol: String,
    pub address: String,
    #[serde(default)]
    pub decimals: Option<u32>,
}

/// Named wallet row as stored by the address registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletEntry {
    pub network: Network,
    #[serde(alias = "wallet_name")]
    pub name: String,
    pub address: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    tokens: Vec<TokenEntry>,
    #[serde(default)]
    wallets: Vec<WalletEntry>,
}

/// Immutable registry snapshot handed to the ledger at call time
#[derive(Debug, Clone, Default)]
pub struct StaticTokenRegistry {
    tokens: Vec<TokenEntry>,
    wallets: Vec<WalletEntry>,
}

impl StaticTokenRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the well-known USDT contracts on both networks
    pub fn with_defaults() -> Self {
        Self::new()
            .with_token(Network::Ethereum, TokenContract::new("USDT", ETH_USDT_CONTRACT).with_decimals(6))
            .with_token(Network::Tron, TokenContract::new("USDT", TRON_USDT_CONTRACT).with_decimals(6))
    }

    pub fn with_token(mut self, network: Network, contract: TokenContract) -> Self {
        self.tokens.push(TokenEntry {
            network,
            symbol: contract.symbol,
            address: contract.contract_address,
            decimals: contract.decimals,
        });
        self
    }

    pub fn with_wallet(mut self, network: Network, name: impl Into<String>, address: impl Into<String>) -> Self {
        self.wallets.push(WalletEntry {
            network,
            name: name.into(),
            address: address.into(),
        });
        self
    }

    /// Parse a registry document: `{"tokens": [...], "wallets": [...]}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(json)
            .map_err(|e| LedgerError::Config(format!("invalid registry: {}", e)))?;
        Ok(Self {
            tokens: file
                .tokens
                .into_iter()
                .map(|t| TokenEntry {
                    symbol: t.symbol.trim().to_ascii_uppercase(),
                    ..t
                })
                .collect(),
            wallets: file.wallets,
        })
    }

    /// Load a registry document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Config(format!("cannot read registry {}: {}", path.display(), e)))?;
        let registry = Self::from_json_str(&json)?;
        info!(
            "Loaded registry from {}: {} tokens, {} wallets",
            path.display(),
            registry.tokens.len(),
            registry.wallets.len()
        );
        Ok(registry)
    }

    /// Named wallets on a network
    pub fn wallets(&self, network: Network) -> Vec<WalletEntry> {
        self.wallets.iter().filter(|w| w.network == network).cloned().collect()
    }

    /// Resolve a wallet name to its address; anything else is returned as given
    pub fn resolve_wallet(&self, network: Network, name_or_address: &str) -> String {
        self.wallets
            .iter()
            .find(|w| w.network == network && w.name.eq_ignore_ascii_case(name_or_address.trim()))
            .map(|w| w.address.clone())
            .unwrap_or_else(|| name_or_address.trim().to_string())
    }
}

impl TokenRegistry for StaticTokenRegistry {
    fn list_token_contracts(&self, network: Network) -> Vec<TokenContract> {
        self.tokens
            .iter()
            .filter(|t| t.network == network)
            .map(|t| TokenContract {
                symbol: t.symbol.clone(),
                contract_address: t.address.clone(),
                decimals: t.decimals,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "tokens": [
            {"network": "ETH", "token_name": "usdc", "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "decimals": 6},
            {"network": "TRON", "symbol": "USDT", "address": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t"}
        ],
        "wallets": [
            {"network": "ETH", "wallet_name": "Treasury", "address": "0x00000000000000000000000000000000000000aa"}
        ]
    }"#;

    #[test]
    fn parses_registry_document() {
        let registry = StaticTokenRegistry::from_json_str(DOC).unwrap();
        let eth = registry.list_token_contracts(Network::Ethereum);
        assert_eq!(eth.len(), 1);
        assert_eq!(eth[0].symbol, "USDC");
        assert_eq!(eth[0].decimals, Some(6));
        assert_eq!(registry.list_token_contracts(Network::Tron)[0].decimals, None);
        assert_eq!(registry.wallets(Network::Ethereum).len(), 1);
        assert!(registry.wallets(Network::Tron).is_empty());
    }

    #[test]
    fn lookups_are_case_insensitive() {
        let registry = StaticTokenRegistry::from_json_str(DOC).unwrap();
        let usdc = registry.contract_for_symbol(Network::Ethereum, "Usdc").unwrap();
        assert_eq!(usdc.contract_address, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        assert!(registry.contract_for_symbol(Network::Tron, "USDC").is_none());
    }

    #[test]
    fn resolves_wallet_names() {
        let registry = StaticTokenRegistry::from_json_str(DOC).unwrap();
        assert_eq!(
            registry.resolve_wallet(Network::Ethereum, "treasury"),
            "0x00000000000000000000000000000000000000aa"
        );
        assert_eq!(registry.resolve_wallet(Network::Ethereum, " 0xbb "), "0xbb");
        assert_eq!(registry.resolve_wallet(Network::Tron, "Treasury"), "Treasury");
    }

    #[test]
    fn defaults_cover_usdt_on_both_networks() {
        let registry = StaticTokenRegistry::with_defaults();
        assert!(registry.contract_for_symbol(Network::Ethereum, "USDT").is_some());
        assert!(registry.contract_for_symbol(Network::Tron, "USDT").is_some());
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(
            StaticTokenRegistry::from_json_str("{\"tokens\": 5}"),
            Err(LedgerError::Config(_))
        ));
    }
}
