use crate::catalog::{CatalogSource, HttpCatalog, JsonFileCatalog, SampleCatalog};
use crate::search::engine::EngineSettings;
use crate::search::filter::UnparsedPrice;
use crate::search::sort::PriceOrdering;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Where the catalog comes from
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLocation {
    File(PathBuf),
    Url(String),
    Sample,
}

/// Engine configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Artificial delay before a submitted search is computed
    pub latency: Duration,
    pub engine: EngineSettings,
    pub catalog: CatalogLocation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(300),
            engine: EngineSettings::default(),
            catalog: CatalogLocation::Sample,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let latency = match var("SEARCH_LATENCY_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse()
                    .context("SEARCH_LATENCY_MS must be a valid number")?,
            ),
            None => defaults.latency,
        };
        let cache_capacity = match var("SEARCH_CACHE_CAPACITY") {
            Some(n) => n
                .parse()
                .context("SEARCH_CACHE_CAPACITY must be a valid number")?,
            None => defaults.engine.cache_capacity,
        };
        let price_ordering = match var("SEARCH_PRICE_ORDERING").as_deref() {
            None | Some("magnitude") => PriceOrdering::Magnitude,
            Some("display_text") => PriceOrdering::DisplayText,
            Some(other) => anyhow::bail!(
                "SEARCH_PRICE_ORDERING must be `magnitude` or `display_text`, got `{other}`"
            ),
        };
        let unparsed_price = match var("SEARCH_UNPARSED_PRICE").as_deref() {
            None | Some("zero") => UnparsedPrice::Zero,
            Some("pass_through") => UnparsedPrice::PassThrough,
            Some(other) => anyhow::bail!(
                "SEARCH_UNPARSED_PRICE must be `zero` or `pass_through`, got `{other}`"
            ),
        };
        let catalog = match (var("CATALOG_PATH"), var("CATALOG_URL")) {
            (Some(_), Some(_)) => anyhow::bail!("Set only one of CATALOG_PATH and CATALOG_URL"),
            (Some(path), None) => CatalogLocation::File(PathBuf::from(path)),
            (None, Some(url)) => CatalogLocation::Url(url),
            (None, None) => CatalogLocation::Sample,
        };

        Ok(Self {
            latency,
            engine: EngineSettings {
                price_ordering,
                unparsed_price,
                cache_capacity,
            },
            catalog,
        })
    }

    /// Build the catalog source this configuration points at
    pub fn catalog_source(&self) -> Result<Box<dyn CatalogSource>> {
        let source: Box<dyn CatalogSource> = match &self.catalog {
            CatalogLocation::File(path) => Box::new(JsonFileCatalog::new(path.clone())),
            CatalogLocation::Url(url) => Box::new(HttpCatalog::new(url.clone())?),
            CatalogLocation::Sample => Box::new(SampleCatalog),
        };
        Ok(source)
    }
}
