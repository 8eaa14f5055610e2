// src/store/listing_store.rs

use crate::domain::{DerivedListing, ListingKey, ListingRecord, PriceHistoryError};
use crate::geometry::LatLon;
use geo::{Centroid, MultiPoint, Point};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Listing cards shown per page by the list collaborator.
pub const CARDS_PER_PAGE: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedListing {
    pub key: ListingKey,
    pub error: PriceHistoryError,
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub listings: Vec<Arc<DerivedListing>>,
    /// Mean position of the whole input batch, when requested.
    pub center: Option<LatLon>,
    pub skipped: Vec<SkippedListing>,
}

/// Owns the derived listings currently on screen and the per-identity
/// derivation cache behind them.
///
/// Cache entries outlive the listings that produced them until [`ListingStore::prune`]
/// is called, so a listing that scrolls out and back in is not re-parsed.
#[derive(Debug, Default)]
pub struct ListingStore {
    listings: Vec<Arc<DerivedListing>>,
    memo: HashMap<ListingKey, Arc<DerivedListing>>,
    total_count: Option<u64>,
    derivations: u64,
}

impl ListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a batch and makes it the current listing set in one step.
    ///
    /// A listing whose price history does not parse is left out and reported
    /// in [`IngestOutcome::skipped`]; the rest of the batch still lands.
    pub fn ingest(&mut self, records: Vec<ListingRecord>, compute_center: bool) -> IngestOutcome {
        let center = if compute_center {
            batch_center(&records)
        } else {
            None
        };

        let mut listings = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();

        for record in records {
            let key = record.key();

            if let Some(cached) = self.memo.get(&key) {
                if cached.record == record {
                    listings.push(Arc::clone(cached));
                    continue;
                }
            }

            self.derivations += 1;
            match DerivedListing::derive(record) {
                Ok(derived) => {
                    let derived = Arc::new(derived);
                    self.memo.insert(key, Arc::clone(&derived));
                    listings.push(derived);
                }
                Err(error) => {
                    warn!(?key, %error, "Skipping listing with malformed price history");
                    skipped.push(SkippedListing { key, error });
                }
            }
        }

        debug!(
            kept = listings.len(),
            skipped = skipped.len(),
            cached = self.memo.len(),
            "Listing batch ingested"
        );

        self.listings = listings.clone();

        IngestOutcome {
            listings,
            center,
            skipped,
        }
    }

    /// Read-only snapshot of the current listing set.
    pub fn get_all(&self) -> &[Arc<DerivedListing>] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn set_total_count(&mut self, count: u64) {
        self.total_count = Some(count);
    }

    /// Total matching listings as reported by the API, falling back to what is loaded.
    pub fn total_count(&self) -> u64 {
        self.total_count.unwrap_or(self.listings.len() as u64)
    }

    pub fn total_pages(&self, per_page: usize) -> usize {
        if per_page == 0 {
            return 0;
        }
        (self.total_count() as usize).div_ceil(per_page)
    }

    /// One page of cards, 1-based. Pages past the end are empty.
    pub fn page(&self, page: usize, per_page: usize) -> &[Arc<DerivedListing>] {
        let start = page.saturating_sub(1).saturating_mul(per_page);
        if start >= self.listings.len() {
            return &[];
        }
        let end = (start + per_page).min(self.listings.len());
        &self.listings[start..end]
    }

    /// Number of price-history derivations performed so far.
    pub fn derivations(&self) -> u64 {
        self.derivations
    }

    /// Drops cache entries for listings not in the current set.
    pub fn prune(&mut self) -> usize {
        let before = self.memo.len();
        let live: std::collections::HashSet<&ListingKey> =
            self.listings.iter().map(|l| &l.key).collect();
        self.memo.retain(|key, _| live.contains(key));
        before - self.memo.len()
    }
}

fn batch_center(records: &[ListingRecord]) -> Option<LatLon> {
    let points: MultiPoint<f64> = records
        .iter()
        .filter(|r| r.lat.is_finite() && r.lon.is_finite())
        .map(|r| Point::new(r.lon, r.lat))
        .collect::<Vec<_>>()
        .into();

    points.centroid().map(|c| LatLon::new(c.y(), c.x()))
}
