mod listing_store;

pub use listing_store::{IngestOutcome, ListingStore, SkippedListing, CARDS_PER_PAGE};
