use std::fmt;

use serde::{Deserialize, Serialize};

use super::network::Network;

/// How a value movement is recorded on chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    /// Base coin moved by a signed transaction
    Native,
    /// Base coin moved by contract execution
    Internal,
    /// Contract-issued token (ERC20 / TRC20)
    Token,
}

impl AssetCategory {
    /// Native and internal transfers both move the chain's base coin
    pub fn is_native_asset(&self) -> bool {
        matches!(self, AssetCategory::Native | AssetCategory::Internal)
    }
}

/// Which assets a ledger request covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetFilter {
    All,
    Symbol(String),
}

impl AssetFilter {
    /// `ALL` in any case selects everything, anything else is an uppercase symbol
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            AssetFilter::All
        } else {
            AssetFilter::Symbol(s.to_ascii_uppercase())
        }
    }

    pub fn includes_native(&self, network: Network) -> bool {
        match self {
            AssetFilter::All => true,
            AssetFilter::Symbol(symbol) => network.is_native_symbol(symbol),
        }
    }
}

impl fmt::Display for AssetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetFilter::All => write!(f, "ALL"),
            AssetFilter::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// Registered token contract on one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenContract {
    pub symbol: String,
    pub contract_address: String,
    /// Decimals declared by the contract, when known
    #[serde(default)]
    pub decimals: Option<u32>,
}

impl TokenContract {
    pub fn new(symbol: impl Into<String>, contract_address: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().to_ascii_uppercase(),
            contract_address: contract_address.into(),
            decimals: None,
        }
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }
}
