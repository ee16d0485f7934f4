use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::network::Network;
use super::summary::CounterpartySummary;
use super::transaction::LedgerEntry;

/// Result of one ledger request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerReport {
    pub generated_at: DateTime<Utc>,
    pub address: String,
    pub network: Network,
    pub asset_filter: String,
    pub ledger: Vec<LedgerEntry>,
    pub summary: Vec<CounterpartySummary>,
    /// Records dropped for an unparseable amount or a missing field
    pub skipped: usize,
}

impl LedgerReport {
    /// Last running balance of every asset in the ledger
    pub fn final_balances(&self) -> BTreeMap<String, Decimal> {
        self.ledger
            .iter()
            .map(|entry| (entry.asset_symbol().to_string(), entry.running_balance))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    pub fn transaction_count(&self) -> usize {
        self.ledger.len()
    }
}
