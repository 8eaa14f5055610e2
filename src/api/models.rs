// src/api/models.rs

use crate::domain::ListingRecord;
use crate::geometry::ViewportBounds;
use serde::{Deserialize, Deserializer};
use tracing::warn;

// response
//  ├── count   (number, sometimes a numeric string)
//  └── data    [ListingRecord]

/// One response from the listings endpoint.
///
/// Records are decoded one by one; an entry that does not fit
/// [`ListingRecord`] is logged and counted in `rejected` instead of failing
/// the whole page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawListingsPage")]
pub struct ListingsPage {
    pub count: u64,
    pub data: Vec<ListingRecord>,
    pub rejected: usize,
}

impl ListingsPage {
    pub fn new(count: u64, data: Vec<ListingRecord>) -> Self {
        Self {
            count,
            data,
            rejected: 0,
        }
    }
}

#[derive(Deserialize)]
struct RawListingsPage {
    #[serde(deserialize_with = "count_from_number_or_string")]
    count: u64,
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

impl From<RawListingsPage> for ListingsPage {
    fn from(raw: RawListingsPage) -> Self {
        let mut data = Vec::with_capacity(raw.data.len());
        let mut rejected = 0;

        for (index, value) in raw.data.into_iter().enumerate() {
            match serde_json::from_value::<ListingRecord>(value) {
                Ok(record) => data.push(record),
                Err(error) => {
                    warn!(index, %error, "Skipping listing that does not match the schema");
                    rejected += 1;
                }
            }
        }

        Self {
            count: raw.count,
            data,
            rejected,
        }
    }
}

fn count_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// User-selected listing criteria sent along with bounds queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    /// 0 means any.
    pub beds: u32,
    /// 0 means any.
    pub baths: u32,
    pub listing_type: Option<String>,
    pub home_type: Option<String>,
}

impl ListingFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        // The slider never lets min cross max, so normalize the same way.
        let (min, max) = match (self.min_price, self.max_price) {
            (Some(a), Some(b)) if a > b => (Some(b), Some(a)),
            other => other,
        };
        if let Some(min) = min {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = max {
            pairs.push(("maxPrice", max.to_string()));
        }
        if self.beds > 0 {
            pairs.push(("beds", self.beds.to_string()));
        }
        if self.baths > 0 {
            pairs.push(("baths", self.baths.to_string()));
        }
        if let Some(t) = selected(&self.listing_type) {
            pairs.push(("listingType", t.to_string()));
        }
        if let Some(t) = selected(&self.home_type) {
            pairs.push(("homeType", t.to_string()));
        }

        pairs
    }
}

/// "All" in a dropdown is the same as no selection.
fn selected(choice: &Option<String>) -> Option<&str> {
    choice
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
}

/// What to ask the listings API for.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingQuery {
    /// Initial bulk load.
    All { limit: u32 },
    /// Listings inside the current viewport, narrowed by the filter.
    Bounds {
        bounds: ViewportBounds,
        filter: ListingFilter,
        limit: u32,
    },
}

impl ListingQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            ListingQuery::All { limit } => vec![("limit", limit.to_string())],
            ListingQuery::Bounds {
                bounds,
                filter,
                limit,
            } => {
                let mut pairs = bounds.query_pairs();
                pairs.extend(filter.query_pairs());
                pairs.push(("limit", limit.to_string()));
                pairs
            }
        }
    }
}
