use crate::models::{ListingRecord, SortKey};
use crate::search::normalize::try_parse_price;
use std::cmp::Ordering;

/// What "price" means when sorting by price
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceOrdering {
    /// Normalized man-won magnitude, display text on ties
    #[default]
    Magnitude,
    /// Numeric-aware collation of the raw display text
    DisplayText,
}

/// Stable in-place sort of `listings` by `key`.
pub fn sort_listings<L>(listings: &mut [L], key: SortKey, ordering: PriceOrdering)
where
    L: AsRef<ListingRecord>,
{
    match key {
        SortKey::Newest => listings.sort_by(|a, b| b.as_ref().id.cmp(&a.as_ref().id)),
        SortKey::PriceAsc => listings.sort_by(|a, b| compare_price(a.as_ref(), b.as_ref(), ordering)),
        SortKey::PriceDesc => {
            listings.sort_by(|a, b| compare_price(b.as_ref(), a.as_ref(), ordering))
        }
    }
}

fn compare_price(a: &ListingRecord, b: &ListingRecord, ordering: PriceOrdering) -> Ordering {
    match ordering {
        PriceOrdering::DisplayText => natural_cmp(&a.price, &b.price),
        PriceOrdering::Magnitude => {
            // Unparseable prices sort as the smallest, matching the filter's 0
            let pa = try_parse_price(&a.price, a.transaction_category).unwrap_or(0);
            let pb = try_parse_price(&b.price, b.transaction_category).unwrap_or(0);
            pa.cmp(&pb).then_with(|| natural_cmp(&a.price, &b.price))
        }
    }
}

/// Compare strings chunk by chunk, digit runs by numeric value.
///
/// `"9억"` sorts before `"12억"`, and `"월세 50/100"` before `"월세 500/20"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = compare_chunk(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn compare_chunk(x: &str, y: &str) -> Ordering {
    let x_digits = x.starts_with(|c: char| c.is_ascii_digit());
    let y_digits = y.starts_with(|c: char| c.is_ascii_digit());
    match (x_digits, y_digits) {
        (true, true) => {
            let xt = x.trim_start_matches('0');
            let yt = y.trim_start_matches('0');
            // Longer digit run is the bigger number; no overflow on long runs
            xt.len().cmp(&yt.len()).then_with(|| xt.cmp(yt))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => x.cmp(y),
    }
}

/// Split into alternating runs of ASCII digits and everything else
fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map_or(rest.len(), |(i, _)| i);
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}
