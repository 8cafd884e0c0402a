pub mod file;
pub mod http;
pub mod sample;
pub mod traits;

pub use file::JsonFileCatalog;
pub use http::HttpCatalog;
pub use sample::SampleCatalog;
pub use traits::CatalogSource;

use crate::models::ListingRecord;
use anyhow::Result;
use std::collections::HashSet;

/// Reject catalogs where two listings share an id
pub fn ensure_unique_ids(listings: &[ListingRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(listings.len());
    for listing in listings {
        if !seen.insert(listing.id) {
            anyhow::bail!("duplicate listing id {} in catalog", listing.id);
        }
    }
    Ok(())
}
