pub mod engine;
pub mod filter;
pub mod normalize;
pub mod session;
pub mod sort;

pub use engine::{Catalog, EngineSettings, Hits, SearchEngine, Searcher};
pub use filter::{FilterOptions, UnparsedPrice};
pub use normalize::{parse_area, parse_price, try_parse_price, AreaValue};
pub use session::{QuerySession, SearchState, Snapshot};
pub use sort::{sort_listings, PriceOrdering};
