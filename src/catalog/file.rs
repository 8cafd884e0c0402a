use crate::catalog::{ensure_unique_ids, CatalogSource};
use crate::models::ListingRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Catalog stored as a JSON array of listings on disk
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn load(&self) -> Result<Vec<ListingRecord>> {
        debug!("Reading catalog file: {}", self.path.display());

        let json = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read catalog file {}", self.path.display()))?;
        let listings: Vec<ListingRecord> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse catalog file {}", self.path.display()))?;
        ensure_unique_ids(&listings)?;

        info!("Loaded {} listings from {}", listings.len(), self.path.display());
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "json-file"
    }
}
