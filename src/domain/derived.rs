use super::{derive_trend, ListingKey, ListingRecord, ListingStatus, PriceHistoryEntry, PriceHistoryError};
use crate::geometry::LatLon;

/// A listing plus everything computed from its price history.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedListing {
    pub key: ListingKey,
    pub record: ListingRecord,
    pub current_price: i64,
    pub percent_change: f64,
    /// Ascending by date.
    pub price_history: Vec<PriceHistoryEntry>,
}

impl DerivedListing {
    pub fn derive(record: ListingRecord) -> Result<Self, PriceHistoryError> {
        let trend = derive_trend(&record.prices)?;

        Ok(Self {
            key: record.key(),
            current_price: trend.current_price,
            percent_change: trend.percent_change,
            price_history: trend.entries,
            record,
        })
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.record.lat, self.record.lon)
    }

    pub fn status(&self) -> &ListingStatus {
        &self.record.listing_type
    }

    pub fn first_price(&self) -> Option<&PriceHistoryEntry> {
        self.price_history.first()
    }
}
