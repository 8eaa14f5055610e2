mod api_error;
mod background;
mod client;
mod models;

pub use api_error::ApiError;
pub use background::{BackgroundFetcher, FetchCompletion};
pub use client::{fetch_with_retry, HttpListingSource, ListingSource, RetryPolicy};
pub use models::{ListingFilter, ListingQuery, ListingsPage};
