use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Chains the ledger knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    #[serde(rename = "ETH", alias = "ETHEREUM")]
    Ethereum,
    #[serde(rename = "TRON", alias = "TRX")]
    Tron,
}

impl Network {
    /// Symbol of the chain's base coin
    pub fn native_symbol(&self) -> &'static str {
        match self {
            Network::Ethereum => "ETH",
            Network::Tron => "TRX",
        }
    }

    /// Decimal places of the base coin (wei / sun)
    pub fn native_decimals(&self) -> u32 {
        match self {
            Network::Ethereum => 18,
            Network::Tron => 6,
        }
    }

    /// Whether the chain reports contract-triggered value movements separately
    pub fn has_internal_transfers(&self) -> bool {
        matches!(self, Network::Ethereum)
    }

    pub fn is_native_symbol(&self, symbol: &str) -> bool {
        symbol.eq_ignore_ascii_case(self.native_symbol())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Ethereum => write!(f, "ETH"),
            Network::Tron => write!(f, "TRON"),
        }
    }
}

impl FromStr for Network {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ETH" | "ETHEREUM" => Ok(Network::Ethereum),
            "TRX" | "TRON" => Ok(Network::Tron),
            other => Err(LedgerError::Config(format!("unsupported network {:?}", other))),
        }
    }
}
