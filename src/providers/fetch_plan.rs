use crate::error::LedgerError;
use crate::models::{AssetFilter, Network, TokenContract};
use crate::traits::token_registry::TokenRegistry;
use crate::Result;

/// One independent explorer call within a ledger fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubFetch {
    Native,
    Internal,
    Token(TokenContract),
}

/// Expand an asset filter into the sub-fetches a network needs.
///
/// `ALL` covers native, internal (where the chain has them) and every
/// registered token. The native symbol covers native and internal only.
/// Any other symbol must be a registered token.
pub fn plan(network: Network, filter: &AssetFilter, registry: &dyn TokenRegistry) -> Result<Vec<SubFetch>> {
    let mut fetches = Vec::new();

    if filter.includes_native(network) {
        fetches.push(SubFetch::Native);
        if network.has_internal_transfers() {
            fetches.push(SubFetch::Internal);
        }
    }

    match filter {
        AssetFilter::All => {
            fetches.extend(registry.list_token_contracts(network).into_iter().map(SubFetch::Token));
        }
        AssetFilter::Symbol(symbol) if !network.is_native_symbol(symbol) => {
            let contract = registry
                .contract_for_symbol(network, symbol)
                .ok_or_else(|| LedgerError::UnknownAsset {
                    symbol: symbol.clone(),
                    network,
                })?;
            fetches.push(SubFetch::Token(contract));
        }
        AssetFilter::Symbol(_) => {}
    }

    Ok(fetches)
}
