use crate::models::{Network, TokenContract};

/// Lookup table of known token contracts, owned outside the ledger
pub trait TokenRegistry: Send + Sync {
    /// All token contracts registered for a network
    fn list_token_contracts(&self, network: Network) -> Vec<TokenContract>;

    /// Contract registered under a symbol (case-insensitive)
    fn contract_for_symbol(&self, network: Network, symbol: &str) -> Option<TokenContract> {
        self.list_token_contracts(network)
            .into_iter()
            .find(|c| c.symbol.eq_ignore_ascii_case(symbol))
    }
}
