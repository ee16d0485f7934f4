//! Event handlers for finished ledger requests

pub mod console;
pub mod json;
pub mod composite;

// Re-export for convenience
pub use console::ConsoleEventHandler;
pub use json::JsonEventHandler;
pub use composite::CompositeEventHandler;
