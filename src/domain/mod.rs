mod derived;
mod listing;
mod price_history;

pub use derived::DerivedListing;
pub use listing::{ListingKey, ListingRecord, ListingStatus};
pub use price_history::{derive_trend, PriceHistoryEntry, PriceHistoryError, PriceTrend};
