use std::sync::Arc;
use async_trait::async_trait;

use crate::error::LedgerError;
use crate::models::LedgerReport;
use crate::traits::event_handler::LedgerEventHandler;

/// Composite event handler that can combine multiple handlers
pub struct CompositeEventHandler {
    handlers: Vec<Arc<dyn LedgerEventHandler>>,
}

impl CompositeEventHandler {
    /// Create a new composite event handler
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Add a handler to the composite
    pub fn add_handler(&mut self, handler: Arc<dyn LedgerEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for CompositeEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerEventHandler for CompositeEventHandler {
    async fn handle_report(&self, report: &LedgerReport) {
        for handler in &self.handlers {
            handler.handle_report(report).await;
        }
    }

    async fn handle_error(&self, error: &LedgerError) {
        for handler in &self.handlers {
            handler.handle_error(error).await;
        }
    }
}
