use crate::models::ListingRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that can supply the catalog.
/// Records must carry unique, stable ids that order by recency.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load every listing from the source
    async fn load(&self) -> Result<Vec<ListingRecord>>;

    /// Get the name of the catalog source
    fn source_name(&self) -> &'static str;
}
