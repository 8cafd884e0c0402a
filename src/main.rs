use anyhow::{Context, Result};
use listing_search::search::SearchEngine;
use listing_search::{EngineConfig, QuerySession, SearchCriteria, SearchState, SortKey};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Request file accepted on the command line
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchRequest {
    criteria: SearchCriteria,
    sort: SortKey,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Listing Search");

    let config = EngineConfig::from_env()?;
    let request = match std::env::args().nth(1) {
        Some(path) => {
            let json = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read search request {path}"))?;
            serde_json::from_str(&json).with_context(|| format!("Failed to parse search request {path}"))?
        }
        None => SearchRequest::default(),
    };

    let source = config.catalog_source()?;
    info!("Loading catalog from {} source...", source.source_name());
    let listings = source.load().await?;

    let engine = Arc::new(SearchEngine::new(listings, config.engine));
    let catalog = engine.catalog();
    info!(
        "Catalog v{} with {} listings, loaded {}",
        catalog.version,
        catalog.len(),
        catalog.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let session = QuerySession::open(engine, config.latency);
    session.submit(request.criteria, request.sort)?;

    match session.settled().await? {
        SearchState::Ready(hits) => {
            info!("✅ {} listings matched\n", hits.len());
            for (i, listing) in hits.iter().enumerate() {
                println!("{}. {} ({})", i + 1, listing.title, listing.price);
                println!("   {} · {}", listing.transaction_category, listing.address);
                println!("   {} rooms, {}", listing.rooms.normalized(), listing.area);
                if !listing.tags.is_empty() {
                    println!("   Tags: {}", listing.tags.join(", "));
                }
                println!("   ID: {}", listing.id);
                println!();
            }
        }
        SearchState::Failed(message) => warn!("{message}"),
        SearchState::Idle | SearchState::Loading => {}
    }

    session.dispose();
    Ok(())
}
