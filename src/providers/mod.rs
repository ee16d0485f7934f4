//! Explorer clients and the source adapters built on them

pub mod etherscan;
pub mod evm_adapter;
pub mod fetch_plan;
pub mod registry;
pub mod tron_adapter;
pub mod tronscan;

// Re-export for convenience
pub use etherscan::{EtherscanApi, EtherscanClient};
pub use evm_adapter::EvmAdapter;
pub use registry::StaticTokenRegistry;
pub use tron_adapter::TronAdapter;
pub use tronscan::{TronscanApi, TronscanClient};
