use crate::models::{ListingRecord, SearchCriteria};
use crate::search::normalize::{parse_area, try_parse_price, AreaValue};
use tracing::debug;

/// Room criteria value that means "four or more"
pub const ROOMS_OR_MORE: &str = "4";

/// How a price that doesn't match its category grammar is ranged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnparsedPrice {
    /// Treat it as 0; it fails any `minPrice` bound
    #[default]
    Zero,
    /// Keep the listing regardless of price bounds, like an unreadable area
    PassThrough,
}

/// Filter settings that are not part of the per-query criteria
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions {
    pub unparsed_price: UnparsedPrice,
}

/// Reduce `catalog` to the listings matching every active criterion.
///
/// The result keeps catalog order and borrows from `catalog`.
pub fn apply<'a, L>(catalog: &'a [L], criteria: &SearchCriteria, options: FilterOptions) -> Vec<&'a L>
where
    L: AsRef<ListingRecord>,
{
    let query = criteria.active_query().map(str::to_lowercase);
    let property_type = criteria.active_property_type();
    let rooms = criteria.active_rooms();

    let matches: Vec<&L> = catalog
        .iter()
        .filter(|entry| {
            let listing = entry.as_ref();
            query.as_deref().map_or(true, |q| matches_text(listing, q))
                && property_type.map_or(true, |t| listing.tags.iter().any(|tag| tag == t))
                && criteria
                    .transaction_category
                    .map_or(true, |c| listing.transaction_category == c)
                && rooms.as_deref().map_or(true, |r| matches_rooms(listing, r))
                && matches_price(listing, criteria, options.unparsed_price)
                && matches_area(listing, criteria)
                && criteria.options.iter().all(|o| listing.has_capability(o))
        })
        .collect();

    debug!(total = catalog.len(), matched = matches.len(), "filtered catalog");
    matches
}

/// `query` must already be lowercased
fn matches_text(listing: &ListingRecord, query: &str) -> bool {
    listing.title.to_lowercase().contains(query)
        || listing.address.to_lowercase().contains(query)
        || listing.tags.iter().any(|tag| tag.to_lowercase().contains(query))
}

fn matches_rooms(listing: &ListingRecord, wanted: &str) -> bool {
    if wanted == ROOMS_OR_MORE {
        return listing.rooms.count().map_or(false, |n| n >= 4.0);
    }
    listing.rooms.normalized() == wanted
}

fn matches_price(listing: &ListingRecord, criteria: &SearchCriteria, policy: UnparsedPrice) -> bool {
    if criteria.min_price.is_none() && criteria.max_price.is_none() {
        return true;
    }
    let price = match try_parse_price(&listing.price, listing.transaction_category) {
        Some(price) => price,
        None => {
            debug!(id = listing.id, price = %listing.price, ?policy, "unparsed price");
            match policy {
                UnparsedPrice::Zero => 0,
                UnparsedPrice::PassThrough => return true,
            }
        }
    };
    in_range(price, criteria.min_price, criteria.max_price)
}

fn matches_area(listing: &ListingRecord, criteria: &SearchCriteria) -> bool {
    if criteria.min_area.is_none() && criteria.max_area.is_none() {
        return true;
    }
    match parse_area(&listing.area) {
        AreaValue::SquareMeters(sqm) => in_range(sqm, criteria.min_area, criteria.max_area),
        AreaValue::PassThrough => true,
    }
}

fn in_range(value: u64, min: Option<u64>, max: Option<u64>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}
