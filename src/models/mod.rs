use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Deal type of a listing. Decides which price grammar applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionCategory {
    #[serde(alias = "매매")]
    Sale,
    #[serde(alias = "전세")]
    DepositLease,
    #[serde(alias = "월세")]
    MonthlyLease,
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sale => "SALE",
            Self::DepositLease => "DEPOSIT_LEASE",
            Self::MonthlyLease => "MONTHLY_LEASE",
        };
        f.write_str(label)
    }
}

/// Room count as it arrives from the catalog: sometimes a number, sometimes text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Rooms {
    Number(serde_json::Number),
    Text(String),
}

impl Rooms {
    /// Text form used for equality matching (`3`, `1.5`, `원룸`)
    pub fn normalized(&self) -> String {
        match self {
            Self::Number(n) => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && n.is_f64() => format!("{}", f as i64),
                _ => n.to_string(),
            },
            Self::Text(t) => t.trim().to_string(),
        }
    }

    /// Numeric room count, if the normalized text is a number
    pub fn count(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(t) => t.trim().parse().ok(),
        }
    }
}

impl From<u32> for Rooms {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Rooms {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A catalog listing. Read-only to the search engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    /// Stable identifier; higher ids were inserted more recently
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub transaction_category: TransactionCategory,
    pub rooms: Rooms,
    /// Display price, e.g. `12억`, `1억 5천`, `월세 50/100`
    pub price: String,
    /// Display area, e.g. `84㎡`
    pub area: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
}

impl ListingRecord {
    /// Whether `label` appears in the combined options and facilities
    pub fn has_capability(&self, label: &str) -> bool {
        self.options
            .iter()
            .chain(self.facilities.iter())
            .any(|held| held == label)
    }
}

impl AsRef<ListingRecord> for ListingRecord {
    fn as_ref(&self) -> &ListingRecord {
        self
    }
}

/// Caller-supplied filter criteria. Every field is optional and an absent
/// field never excludes a listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    /// Case-insensitive substring matched against title, address and tags
    pub query: Option<String>,
    /// `None` means any category; `"ALL"` deserializes to `None`
    #[serde(deserialize_with = "deserialize_category_filter")]
    pub transaction_category: Option<TransactionCategory>,
    /// Required tag, e.g. `아파트`
    pub property_type: Option<String>,
    /// Exact room count, except `"4"` which means four or more
    pub rooms: Option<Rooms>,
    /// Lower price bound in man-won (10,000 currency units)
    pub min_price: Option<u64>,
    /// Upper price bound in man-won
    pub max_price: Option<u64>,
    /// Lower area bound in square meters
    pub min_area: Option<u64>,
    /// Upper area bound in square meters
    pub max_area: Option<u64>,
    /// Labels that must all be present in options ∪ facilities
    pub options: Vec<String>,
}

impl SearchCriteria {
    pub fn active_query(&self) -> Option<&str> {
        non_empty(self.query.as_deref())
    }

    pub fn active_property_type(&self) -> Option<&str> {
        non_empty(self.property_type.as_deref())
    }

    pub fn active_rooms(&self) -> Option<String> {
        self.rooms
            .as_ref()
            .map(Rooms::normalized)
            .filter(|r| !r.is_empty())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Sentinel labels that mean "no category constraint"
const ALL_CATEGORIES: [&str; 2] = ["ALL", "전체"];

fn deserialize_category_filter<'de, D>(deserializer: D) -> Result<Option<TransactionCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) if ALL_CATEGORIES.contains(&label) => Ok(None),
        Some(label) => {
            let value = serde_json::Value::String(label.to_string());
            serde_json::from_value(value)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Result ordering selected by the caller
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Highest id first
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}
