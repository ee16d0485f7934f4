use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::models::{AssetCategory, AssetFilter, Network, RawTransferRecord, TokenContract};
use crate::providers::fetch_plan::{self, SubFetch};
use crate::providers::tronscan::{TronscanApi, TronscanTransfer};
use crate::traits::source_adapter::SourceAdapter;
use crate::traits::token_registry::TokenRegistry;
use crate::Result;

/// Tronscan row tagged with the call it came from
#[derive(Debug, Clone)]
pub enum TronRecord {
    Trx(TronscanTransfer),
    Trc20 {
        contract: TokenContract,
        transfer: TronscanTransfer,
    },
}

impl TronRecord {
    /// Map provider fields onto the common record. Tronscan reports
    /// millisecond timestamps, the ledger works in seconds.
    pub fn into_raw(self) -> RawTransferRecord {
        let network = Network::Tron;
        let (category, symbol, decimals, transfer) = match self {
            TronRecord::Trx(transfer) => (AssetCategory::Native, network.native_symbol().to_string(), None, transfer),
            TronRecord::Trc20 { contract, transfer } => {
                let decimals = transfer.token_decimals().or(contract.decimals);
                (AssetCategory::Token, contract.symbol, decimals, transfer)
            }
        };

        let mut record = RawTransferRecord::new(network, category, symbol);
        record.failed = transfer.is_failed();
        record.timestamp = transfer.timestamp_seconds();
        record.hash = transfer.tx_hash().map(str::to_string);
        record.block_height = transfer.block;
        record.from = transfer.from;
        record.to = transfer.to;
        record.raw_amount = transfer.amount;
        record.decimals = decimals;
        record
    }
}

/// Source adapter for Tron backed by Tronscan
pub struct TronAdapter<A: TronscanApi> {
    api: A,
    registry: Arc<dyn TokenRegistry>,
}

impl<A: TronscanApi> TronAdapter<A> {
    /// Create a new Tron adapter
    pub fn new(api: A, registry: Arc<dyn TokenRegistry>) -> Self {
        Self { api, registry }
    }

    async fn run(&self, address: &str, fetch: SubFetch) -> Result<Vec<TronRecord>> {
        debug!("Tronscan sub-fetch {:?} for {}", fetch, address);
        let records = match fetch {
            SubFetch::Native => self
                .api
                .fetch_trx_transfers(address)
                .await?
                .into_iter()
                .map(TronRecord::Trx)
                .collect(),
            // Tron has no internal-transfer endpoint
            SubFetch::Internal => Vec::new(),
            SubFetch::Token(contract) => self
                .api
                .fetch_trc20_transfers(address, &contract.contract_address)
                .await?
                .into_iter()
                .map(|transfer| TronRecord::Trc20 {
                    contract: contract.clone(),
                    transfer,
                })
                .collect(),
        };
        Ok(records)
    }
}

#[async_trait]
impl<A: TronscanApi> SourceAdapter for TronAdapter<A> {
    fn network(&self) -> Network {
        Network::Tron
    }

    async fn fetch(&self, address: &str, filter: &AssetFilter) -> Result<Vec<RawTransferRecord>> {
        let plan = fetch_plan::plan(Network::Tron, filter, self.registry.as_ref())?;
        let calls = plan.len();

        let batches = try_join_all(plan.into_iter().map(|fetch| self.run(address, fetch))).await?;
        let records: Vec<RawTransferRecord> = batches.into_iter().flatten().map(TronRecord::into_raw).collect();

        info!("Fetched {} TRON records for {} in {} calls", records.len(), address, calls);
        Ok(records)
    }
}
