//! Filter + sort as one pure computation over a shared catalog.
//!
//! Results are memoized per `(criteria, sort key, catalog version)`; swapping
//! the catalog bumps the version and drops every cached result.

use crate::error::{SearchError, SearchResult};
use crate::models::{ListingRecord, SearchCriteria, SortKey};
use crate::search::filter::{self, FilterOptions, UnparsedPrice};
use crate::search::sort::{sort_listings, PriceOrdering};
use chrono::{DateTime, Utc};
use moka::sync::Cache;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Ordered search hits, sharing the catalog's records
pub type Hits = Arc<[Arc<ListingRecord>]>;

/// The compute step a query session schedules
pub trait Searcher: Send + Sync + 'static {
    fn search(&self, criteria: &SearchCriteria, sort: SortKey) -> SearchResult<Hits>;
}

/// An immutable snapshot of the catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    pub listings: Arc<[Arc<ListingRecord>]>,
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new(listings: Vec<ListingRecord>, version: u64) -> Self {
        Self {
            listings: listings.into_iter().map(Arc::new).collect(),
            version,
            loaded_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// Settings shared by every query run through an engine
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub price_ordering: PriceOrdering,
    pub unparsed_price: UnparsedPrice,
    /// Maximum cached results; 0 disables caching
    pub cache_capacity: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            price_ordering: PriceOrdering::default(),
            unparsed_price: UnparsedPrice::default(),
            cache_capacity: 64,
        }
    }
}

#[derive(Serialize)]
struct CacheKey<'a> {
    criteria: &'a SearchCriteria,
    sort: SortKey,
    version: u64,
}

pub struct SearchEngine {
    catalog: RwLock<Catalog>,
    settings: EngineSettings,
    cache: Option<Cache<String, Hits>>,
}

impl SearchEngine {
    pub fn new(listings: Vec<ListingRecord>, settings: EngineSettings) -> Self {
        let cache = (settings.cache_capacity > 0)
            .then(|| Cache::builder().max_capacity(settings.cache_capacity).build());
        let catalog = Catalog::new(listings, 0);
        info!(
            listings = catalog.len(),
            loaded_at = %catalog.loaded_at.to_rfc3339(),
            "search engine ready"
        );

        Self {
            catalog: RwLock::new(catalog),
            settings,
            cache,
        }
    }

    /// Current catalog snapshot
    pub fn catalog(&self) -> Catalog {
        self.catalog.read().clone()
    }

    /// Swap in a new catalog and invalidate cached results
    pub fn replace_catalog(&self, listings: Vec<ListingRecord>) {
        let mut guard = self.catalog.write();
        let version = guard.version + 1;
        *guard = Catalog::new(listings, version);
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
        info!(
            listings = guard.len(),
            version,
            loaded_at = %guard.loaded_at.to_rfc3339(),
            "catalog replaced"
        );
    }

    /// Filter then sort the current catalog.
    pub fn run(&self, criteria: &SearchCriteria, sort: SortKey) -> SearchResult<Hits> {
        log_inverted_ranges(criteria);
        let catalog = self.catalog();

        let key = match &self.cache {
            Some(_) => Some(cache_key(criteria, sort, catalog.version)?),
            None => None,
        };
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hits) = cache.get(key) {
                debug!(version = catalog.version, hits = hits.len(), "search cache hit");
                return Ok(hits);
            }
        }

        let options = FilterOptions {
            unparsed_price: self.settings.unparsed_price,
        };
        let mut matches: Vec<Arc<ListingRecord>> = filter::apply(&catalog.listings[..], criteria, options)
            .into_iter()
            .cloned()
            .collect();
        sort_listings(&mut matches, sort, self.settings.price_ordering);
        let hits: Hits = matches.into();

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.insert(key, hits.clone());
        }
        debug!(version = catalog.version, hits = hits.len(), ?sort, "search computed");
        Ok(hits)
    }
}

fn cache_key(criteria: &SearchCriteria, sort: SortKey, version: u64) -> SearchResult<String> {
    serde_json::to_string(&CacheKey {
        criteria,
        sort,
        version,
    })
    .map_err(|e| SearchError::ComputeFailed(format!("cache key: {e}")))
}

/// Inverted bounds are legal and simply match nothing
fn log_inverted_ranges(criteria: &SearchCriteria) {
    if let (Some(min), Some(max)) = (criteria.min_price, criteria.max_price) {
        if min > max {
            debug!(min, max, "inverted price range, no listing can match");
        }
    }
    if let (Some(min), Some(max)) = (criteria.min_area, criteria.max_area) {
        if min > max {
            debug!(min, max, "inverted area range, no listing can match");
        }
    }
}

impl Searcher for SearchEngine {
    fn search(&self, criteria: &SearchCriteria, sort: SortKey) -> SearchResult<Hits> {
        self.run(criteria, sort)
    }
}
