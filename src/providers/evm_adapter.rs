use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::models::{AssetCategory, AssetFilter, Network, RawTransferRecord, TokenContract};
use crate::providers::etherscan::{EtherscanApi, EtherscanTx};
use crate::providers::fetch_plan::{self, SubFetch};
use crate::traits::source_adapter::SourceAdapter;
use crate::traits::token_registry::TokenRegistry;
use crate::Result;

/// Etherscan row tagged with the call it came from
#[derive(Debug, Clone)]
pub enum EvmRecord {
    Native(EtherscanTx),
    Internal(EtherscanTx),
    Token { contract: TokenContract, tx: EtherscanTx },
}

impl EvmRecord {
    /// Map provider fields onto the common record; absent fields stay `None`
    pub fn into_raw(self, network: Network) -> RawTransferRecord {
        let (category, symbol, decimals, tx) = match self {
            EvmRecord::Native(tx) => (AssetCategory::Native, network.native_symbol().to_string(), None, tx),
            EvmRecord::Internal(tx) => (AssetCategory::Internal, network.native_symbol().to_string(), None, tx),
            EvmRecord::Token { contract, tx } => {
                let decimals = tx.token_decimal.or(contract.decimals);
                (AssetCategory::Token, contract.symbol, decimals, tx)
            }
        };

        let mut record = RawTransferRecord::new(network, category, symbol);
        record.failed = tx.is_failed();
        record.hash = tx.hash;
        record.block_height = tx.block_number;
        record.timestamp = tx.time_stamp;
        record.from = tx.from;
        record.to = tx.to;
        record.raw_amount = tx.value;
        record.gas_price = tx.gas_price;
        record.gas_used = tx.gas_used;
        record.decimals = decimals;
        record
    }
}

/// Source adapter for Ethereum-compatible chains backed by Etherscan
pub struct EvmAdapter<A: EtherscanApi> {
    api: A,
    registry: Arc<dyn TokenRegistry>,
    network: Network,
}

impl<A: EtherscanApi> EvmAdapter<A> {
    /// Create a new EVM adapter
    pub fn new(api: A, registry: Arc<dyn TokenRegistry>) -> Self {
        Self {
            api,
            registry,
            network: Network::Ethereum,
        }
    }

    async fn run(&self, address: &str, fetch: SubFetch) -> Result<Vec<EvmRecord>> {
        debug!("Etherscan sub-fetch {:?} for {}", fetch, address);
        let records = match fetch {
            SubFetch::Native => self
                .api
                .fetch_native_transfers(address)
                .await?
                .into_iter()
                .map(EvmRecord::Native)
                .collect(),
            SubFetch::Internal => self
                .api
                .fetch_internal_transfers(address)
                .await?
                .into_iter()
                .map(EvmRecord::Internal)
                .collect(),
            SubFetch::Token(contract) => self
                .api
                .fetch_token_transfers(address, &contract.contract_address)
                .await?
                .into_iter()
                .map(|tx| EvmRecord::Token {
                    contract: contract.clone(),
                    tx,
                })
                .collect(),
        };
        Ok(records)
    }
}

#[async_trait]
impl<A: EtherscanApi> SourceAdapter for EvmAdapter<A> {
    fn network(&self) -> Network {
        self.network
    }

    async fn fetch(&self, address: &str, filter: &AssetFilter) -> Result<Vec<RawTransferRecord>> {
        let plan = fetch_plan::plan(self.network, filter, self.registry.as_ref())?;
        let calls = plan.len();

        let batches = try_join_all(plan.into_iter().map(|fetch| self.run(address, fetch))).await?;
        let records: Vec<RawTransferRecord> = batches
            .into_iter()
            .flatten()
            .map(|r| r.into_raw(self.network))
            .collect();

        info!("Fetched {} {} records for {} in {} calls", records.len(), self.network, address, calls);
        Ok(records)
    }
}
