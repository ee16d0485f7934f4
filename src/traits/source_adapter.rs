use async_trait::async_trait;

use crate::models::{AssetFilter, Network, RawTransferRecord};
use crate::Result;

/// Core trait for pulling transfer history from one network's explorer
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Network this adapter reads
    fn network(&self) -> Network;

    /// Fetch every transfer matching the filter for an address.
    ///
    /// `AssetFilter::All` fans out to one sub-fetch per supported category and
    /// registered token. Results are unordered. An empty result is not an
    /// error; a failed sub-fetch fails the whole call.
    async fn fetch(&self, address: &str, filter: &AssetFilter) -> Result<Vec<RawTransferRecord>>;
}
