//! Price and area text normalization.
//!
//! Prices come back in man-won (10,000 currency units), areas in square meters.
//! Both parsers are fail-soft and never return an error, but they degrade
//! differently: an unreadable price becomes `0`, an unreadable area becomes
//! [`AreaValue::PassThrough`].
//!
//! Sale and deposit prices share the `<N>억[ <M>천[만]]` grammar, so `12억 5천`
//! and `1억 5천만` both parse. Still unsupported, and therefore `0`: bare 만 units
//! (`9000만`), thousands separators (`1,500`), decimals (`1.5억`), and any 월세
//! text outside a monthly-lease listing.

use crate::models::TransactionCategory;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Man-won per 억
const EOK: u64 = 10_000;
/// Man-won per 천 (in the 천만 sense used by deposit prices)
const CHEON: u64 = 1_000;

static EOK_PRICE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s*억(?:\s*(\d+)\s*천\s*만?)?$").unwrap());
static MONTHLY_PRICE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^월세\s*(\d+)(?:\s*/\s*(\d+))?$").unwrap());
static AREA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)").unwrap());

/// Normalized area of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaValue {
    SquareMeters(u64),
    /// No leading number; satisfies any area bound
    PassThrough,
}

/// Parse a display price using the grammar of `category`.
///
/// Returns `None` when the text doesn't match that grammar.
pub fn try_parse_price(text: &str, category: TransactionCategory) -> Option<u64> {
    let text = text.trim();
    match category {
        TransactionCategory::Sale | TransactionCategory::DepositLease => {
            let caps = EOK_PRICE.captures(text)?;
            let eok = number(caps.get(1)?.as_str())?.checked_mul(EOK)?;
            let cheon = match caps.get(2) {
                Some(m) => number(m.as_str())?.checked_mul(CHEON)?,
                None => 0,
            };
            eok.checked_add(cheon)
        }
        // Only the deposit part takes part in range comparison; the
        // monthly rent after the slash is ignored.
        TransactionCategory::MonthlyLease => {
            let caps = MONTHLY_PRICE.captures(text)?;
            number(caps.get(1)?.as_str())
        }
    }
}

/// Parse a display price, falling back to `0` when it doesn't match.
///
/// A `0` fallback fails any `minPrice` bound, so a listing with an
/// unreadable price drops out of filtered results.
pub fn parse_price(text: &str, category: TransactionCategory) -> u64 {
    try_parse_price(text, category).unwrap_or_else(|| {
        debug!(price = text, %category, "price does not match category grammar, treating as 0");
        0
    })
}

/// Parse the leading integer of an area string such as `84㎡` or `25평`.
pub fn parse_area(text: &str) -> AreaValue {
    match AREA
        .captures(text.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| number(m.as_str()))
    {
        Some(sqm) => AreaValue::SquareMeters(sqm),
        None => {
            debug!(area = text, "area has no leading number, passing through");
            AreaValue::PassThrough
        }
    }
}

fn number(digits: &str) -> Option<u64> {
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_prices() {
        assert_eq!(parse_price("12억", TransactionCategory::Sale), 120_000);
        assert_eq!(parse_price(" 8 억 ", TransactionCategory::Sale), 80_000);
        assert_eq!(parse_price("12억 5천", TransactionCategory::Sale), 125_000);
        assert_eq!(parse_price("12억 5천만", TransactionCategory::Sale), 125_000);
    }

    #[test]
    fn deposit_prices() {
        assert_eq!(parse_price("1억 5천", TransactionCategory::DepositLease), 15_000);
        assert_eq!(parse_price("3억", TransactionCategory::DepositLease), 30_000);
        assert_eq!(parse_price("2억5천", TransactionCategory::DepositLease), 25_000);
        assert_eq!(parse_price("1억 5천만", TransactionCategory::DepositLease), 15_000);
        assert_eq!(parse_price("1억 만", TransactionCategory::DepositLease), 0);
    }

    #[test]
    fn monthly_prices_use_deposit_component() {
        assert_eq!(parse_price("월세 50/100", TransactionCategory::MonthlyLease), 50);
        assert_eq!(parse_price("월세 1000", TransactionCategory::MonthlyLease), 1000);
        assert_eq!(parse_price("월세 500 / 45", TransactionCategory::MonthlyLease), 500);
    }

    #[test]
    fn grammar_mismatch_falls_back_to_zero() {
        assert_eq!(try_parse_price("월세 50/100", TransactionCategory::Sale), None);
        assert_eq!(parse_price("월세 50/100", TransactionCategory::Sale), 0);
        assert_eq!(parse_price("12억", TransactionCategory::MonthlyLease), 0);
        assert_eq!(parse_price("가격 협의", TransactionCategory::DepositLease), 0);
        assert_eq!(parse_price("", TransactionCategory::Sale), 0);
        assert_eq!(parse_price("9000만", TransactionCategory::DepositLease), 0);
        assert_eq!(parse_price("1.5억", TransactionCategory::Sale), 0);
    }

    #[test]
    fn overflowing_price_is_a_mismatch() {
        let huge = format!("{}억", u64::MAX);
        assert_eq!(try_parse_price(&huge, TransactionCategory::Sale), None);
    }

    #[test]
    fn areas() {
        assert_eq!(parse_area("84㎡"), AreaValue::SquareMeters(84));
        assert_eq!(parse_area(" 112m²"), AreaValue::SquareMeters(112));
        assert_eq!(parse_area("33평"), AreaValue::SquareMeters(33));
        assert_eq!(parse_area("㎡"), AreaValue::PassThrough);
        assert_eq!(parse_area("약 84㎡"), AreaValue::PassThrough);
        assert_eq!(parse_area(""), AreaValue::PassThrough);
    }
}
