use crate::catalog::{ensure_unique_ids, CatalogSource};
use crate::models::ListingRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Catalog served as a JSON array of listings over HTTP
pub struct HttpCatalog {
    client: Client,
    url: String,
}

impl HttpCatalog {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn load(&self) -> Result<Vec<ListingRecord>> {
        debug!("Fetching catalog: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to fetch catalog")?;

        if !response.status().is_success() {
            warn!("Catalog endpoint returned status: {}", response.status());
            anyhow::bail!("Failed to fetch catalog: {}", response.status());
        }

        let listings: Vec<ListingRecord> = response
            .json()
            .await
            .context("Failed to decode catalog response")?;
        ensure_unique_ids(&listings)?;

        info!("Fetched {} listings from {}", listings.len(), self.url);
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
