//! Listing search engine: price/area normalization, a multi-criteria filter
//! pipeline, result ordering, and a cancellable query session on top.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod search;

pub use config::EngineConfig;
pub use error::{SearchError, SearchResult};
pub use models::{ListingRecord, Rooms, SearchCriteria, SortKey, TransactionCategory};
pub use search::{QuerySession, SearchEngine, SearchState};
