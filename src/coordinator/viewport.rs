// src/coordinator/viewport.rs

use super::{Epoch, EpochCounter};
use crate::api::{ApiError, ListingFilter, ListingQuery, ListingsPage};
use crate::geometry::ViewportBounds;
use crate::store::{ListingStore, SkippedListing};
use crate::timing::{Debouncer, Millis};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorSettings {
    /// Quiet period after the last settled view change before fetching.
    pub debounce: Millis,
    /// How long a request may stay in flight before the coordinator gives up on it.
    pub request_timeout: Millis,
    pub limit: u32,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            debounce: 400,
            request_timeout: 15_000,
            limit: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Fetching { epoch: Epoch, issued_at: Millis },
}

/// A request the host must run and report back through [`ViewportCoordinator::complete`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub epoch: Epoch,
    pub query: ListingQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Applied {
        kept: usize,
        skipped: Vec<SkippedListing>,
    },
    StaleDiscarded,
    Failed(ApiError),
}

/// Turns settled view changes into at most one bounds-scoped fetch at a time
/// and makes sure only the newest response reaches the store.
#[derive(Debug)]
pub struct ViewportCoordinator {
    settings: CoordinatorSettings,
    epochs: EpochCounter,
    phase: FetchPhase,
    debounce: Debouncer<ViewportBounds>,
    filter: ListingFilter,
    // Set by a filter change: the next issued fetch replaces whatever is in flight.
    supersede_pending: bool,
    last_bounds: Option<ViewportBounds>,
}

impl ViewportCoordinator {
    pub fn new(settings: CoordinatorSettings) -> Self {
        Self {
            settings,
            epochs: EpochCounter::new(),
            phase: FetchPhase::Idle,
            debounce: Debouncer::new(settings.debounce),
            filter: ListingFilter::default(),
            supersede_pending: false,
            last_bounds: None,
        }
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn current_epoch(&self) -> Epoch {
        self.epochs.current()
    }

    pub fn filter(&self) -> &ListingFilter {
        &self.filter
    }

    pub fn last_bounds(&self) -> Option<ViewportBounds> {
        self.last_bounds
    }

    /// Earliest time [`poll`](Self::poll) can do something, for hosts that sleep.
    pub fn next_deadline(&self) -> Option<Millis> {
        let timeout = match self.phase {
            FetchPhase::Fetching { issued_at, .. } => Some(issued_at + self.settings.request_timeout),
            FetchPhase::Idle => None,
        };
        match (self.debounce.deadline(), timeout) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// A pan or zoom came to rest.
    pub fn bounds_settled(&mut self, bounds: ViewportBounds, now: Millis) {
        self.debounce.push(bounds, now);
    }

    /// New filter criteria; refetches the given bounds once the debounce settles.
    pub fn set_filter(&mut self, filter: ListingFilter, bounds: ViewportBounds, now: Millis) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.supersede_pending = true;
        self.debounce.push(bounds, now);
    }

    /// Advances timers. Returns a fetch the host should start now, if any.
    pub fn poll(&mut self, now: Millis) -> Option<FetchTicket> {
        self.expire_hung_request(now);

        let bounds = self.debounce.poll(now)?;
        if std::mem::take(&mut self.supersede_pending) {
            return Some(self.start(bounds, now));
        }
        self.issue(bounds, now)
    }

    /// Starts a fetch for `bounds` unless one is already in flight, in which
    /// case the request is dropped rather than queued.
    pub fn issue(&mut self, bounds: ViewportBounds, now: Millis) -> Option<FetchTicket> {
        if let FetchPhase::Fetching { epoch, .. } = self.phase {
            debug!(in_flight = epoch.value(), "Bounds fetch dropped, request already in flight");
            return None;
        }
        Some(self.start(bounds, now))
    }

    fn start(&mut self, bounds: ViewportBounds, now: Millis) -> FetchTicket {
        let epoch = self.epochs.advance();
        self.phase = FetchPhase::Fetching {
            epoch,
            issued_at: now,
        };
        self.last_bounds = Some(bounds);

        debug!(epoch = epoch.value(), ?bounds, "Bounds fetch issued");

        FetchTicket {
            epoch,
            query: ListingQuery::Bounds {
                bounds,
                filter: self.filter.clone(),
                limit: self.settings.limit,
            },
        }
    }

    fn expire_hung_request(&mut self, now: Millis) {
        if let FetchPhase::Fetching { epoch, issued_at } = self.phase {
            if now.saturating_sub(issued_at) >= self.settings.request_timeout {
                warn!(
                    epoch = epoch.value(),
                    waited_ms = now.saturating_sub(issued_at),
                    "⏱️ Bounds fetch timed out, late response will be ignored"
                );
                // Move past the hung epoch so its eventual reply is stale.
                self.epochs.advance();
                self.phase = FetchPhase::Idle;
            }
        }
    }

    /// Applies a finished fetch to `store` if it is still the latest one.
    ///
    /// Failed and stale completions never touch the store.
    pub fn complete(
        &mut self,
        epoch: Epoch,
        result: Result<ListingsPage, ApiError>,
        store: &mut ListingStore,
    ) -> FetchOutcome {
        if !self.epochs.is_current(epoch) {
            debug!(
                epoch = epoch.value(),
                current = self.epochs.current().value(),
                "Stale bounds response discarded"
            );
            return FetchOutcome::StaleDiscarded;
        }

        if matches!(self.phase, FetchPhase::Fetching { epoch: e, .. } if e == epoch) {
            self.phase = FetchPhase::Idle;
        }

        match result {
            Ok(page) => {
                let count = page.count;
                let rejected = page.rejected;
                let outcome = store.ingest(page.data, false);
                store.set_total_count(count);
                info!(
                    epoch = epoch.value(),
                    kept = outcome.listings.len(),
                    skipped = outcome.skipped.len(),
                    rejected,
                    "Bounds fetch applied"
                );
                FetchOutcome::Applied {
                    kept: outcome.listings.len(),
                    skipped: outcome.skipped,
                }
            }
            Err(e) => {
                warn!(epoch = epoch.value(), error = %e, "Error fetching listings for bounds");
                FetchOutcome::Failed(e)
            }
        }
    }
}
