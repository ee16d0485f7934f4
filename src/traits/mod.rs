//! Core traits for the wallet ledger

pub mod source_adapter;
pub mod token_registry;
pub mod event_handler;

// Re-export for convenience
pub use source_adapter::SourceAdapter;
pub use token_registry::TokenRegistry;
pub use event_handler::LedgerEventHandler;
