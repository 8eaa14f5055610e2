// src/app.rs

use crate::api::{
    fetch_with_retry, ApiError, FetchCompletion, ListingFilter, ListingQuery, ListingSource,
    RetryPolicy,
};
use crate::config::Config;
use crate::coordinator::{CoordinatorSettings, FetchOutcome, FetchTicket, ViewportCoordinator};
use crate::db::{load_fresh_snapshot, save_snapshot, Database};
use crate::domain::ListingRecord;
use crate::errors::AppError;
use crate::geometry::{LatLon, MapView, PixelSize, Projection, ViewportBounds};
use crate::interaction::{PointerSample, TooltipLayer, TooltipUpdate};
use crate::render::{HeatRenderer, PixelCanvas, RedrawScheduler, RepaintStats, Surface};
use crate::store::ListingStore;
use crate::templates::error_banner;
use crate::timing::Millis;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const INITIAL_ZOOM: f64 = 6.0;

/// Where the map opens when the first load has no positioned listings.
pub const FALLBACK_CENTER: LatLon = LatLon {
    lat: 39.83,
    lon: -98.58,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Snapshot,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    pub origin: LoadOrigin,
    pub kept: usize,
    pub skipped: usize,
}

/// What the host has to act on after a timer tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    /// Bounds fetch to start now, if one is due.
    pub fetch: Option<FetchTicket>,
    /// Touch tooltips hide on their own; `Hide` means take it off screen.
    pub tooltip: TooltipUpdate,
}

/// Everything the heat map needs between events, owned in one place.
///
/// The host forwards map, pointer, timer and fetch events here; nothing is
/// shared through globals.
#[derive(Debug)]
pub struct HeatmapApp {
    fetch_limit: u32,
    container: PixelSize,
    // None until the first load gives the map a center.
    view: Option<MapView>,
    ready: bool,
    store: ListingStore,
    coordinator: ViewportCoordinator,
    renderer: HeatRenderer,
    canvas: PixelCanvas,
    scheduler: RedrawScheduler,
    tooltip: TooltipLayer,
    banner: Option<String>,
}

impl HeatmapApp {
    pub fn new(config: &Config, container: PixelSize) -> Self {
        let settings = CoordinatorSettings {
            debounce: config.bounds_debounce,
            request_timeout: config.request_timeout,
            limit: config.fetch_limit,
        };

        Self {
            fetch_limit: config.fetch_limit,
            container,
            view: None,
            ready: false,
            store: ListingStore::new(),
            coordinator: ViewportCoordinator::new(settings),
            renderer: HeatRenderer::default(),
            canvas: PixelCanvas::new(container),
            scheduler: RedrawScheduler::new(),
            tooltip: TooltipLayer::new(config.pointer_throttle),
            banner: None,
        }
    }

    /// Initial load: a fresh local snapshot if there is one, else a bulk fetch.
    ///
    /// Either way the map is centered on the mean position of the loaded batch.
    /// Snapshot problems only cost a network round trip; a failed bulk fetch
    /// leaves the map empty with the error banner set.
    pub fn bootstrap<S, R, F>(
        &mut self,
        source: &S,
        cache: Option<&Database>,
        now_ms: i64,
        max_age_ms: u64,
        rng: &mut R,
        sleep: F,
    ) -> Result<BootstrapReport, AppError>
    where
        S: ListingSource + ?Sized,
        R: Rng,
        F: FnMut(Duration),
    {
        if let Some(db) = cache {
            match load_fresh_snapshot(db, now_ms, max_age_ms) {
                Ok(Some(snapshot)) => {
                    info!(records = snapshot.records.len(), "📦 Using cached listings");
                    let count = snapshot.total_count;
                    let report =
                        self.load_batch(snapshot.records, count, 0, LoadOrigin::Snapshot);
                    return Ok(report);
                }
                Ok(None) => info!("No fresh listing snapshot, fetching"),
                Err(e) => warn!(error = %e, "Listing snapshot unreadable, fetching"),
            }
        }

        let query = ListingQuery::All {
            limit: self.fetch_limit,
        };
        let page = match fetch_with_retry(source, &query, RetryPolicy::bulk_load(), rng, sleep) {
            Ok(page) => page,
            Err(e) => return Err(self.fail(e)),
        };

        if let Some(db) = cache {
            if let Err(e) = save_snapshot(db, &page.data, page.count, now_ms) {
                warn!(error = %e, "Could not save listing snapshot");
            }
        }

        Ok(self.load_batch(page.data, page.count, page.rejected, LoadOrigin::Network))
    }

    fn load_batch(
        &mut self,
        records: Vec<ListingRecord>,
        total_count: u64,
        rejected: usize,
        origin: LoadOrigin,
    ) -> BootstrapReport {
        let outcome = self.store.ingest(records, true);
        self.store.set_total_count(total_count);
        self.banner = None;

        match outcome.center {
            Some(center) => self.center_on(center),
            None if self.view.is_none() => {
                info!("No positioned listings loaded, opening the map at the fallback center");
                self.center_on(FALLBACK_CENTER);
            }
            None => {}
        }

        BootstrapReport {
            origin,
            kept: outcome.listings.len(),
            skipped: outcome.skipped.len() + rejected,
        }
    }

    fn center_on(&mut self, center: LatLon) {
        match self.view.as_mut() {
            Some(view) => {
                let zoom = view.zoom();
                view.set_view(center, zoom);
            }
            None => self.view = Some(MapView::new(center, INITIAL_ZOOM, self.container)),
        }
        self.scheduler.request_redraw();
    }

    fn fail(&mut self, err: ApiError) -> AppError {
        let err = AppError::from(err);
        warn!(error = %err, "Error fetching listings");
        self.banner = Some(error_banner(&err, !self.store.is_empty()).into_string());
        err
    }

    pub fn view(&self) -> Option<&MapView> {
        self.view.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn store(&self) -> &ListingStore {
        &self.store
    }

    pub fn coordinator(&self) -> &ViewportCoordinator {
        &self.coordinator
    }

    pub fn renderer(&self) -> &HeatRenderer {
        &self.renderer
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    pub fn tooltip(&self) -> &TooltipLayer {
        &self.tooltip
    }

    /// HTML for the load-failure banner, while one is showing.
    pub fn error_banner_html(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn viewport_bounds(&self) -> Option<ViewportBounds> {
        self.view.as_ref().map(|v| v.bounds())
    }

    /// Tiles are in; painting is allowed from now on.
    pub fn on_map_ready(&mut self) {
        if self.ready {
            return;
        }
        self.ready = true;
        self.sync_canvas_size();
        self.scheduler.request_redraw();
    }

    /// Continuous pan/zoom. Only repaints; fetching waits for the view to settle.
    pub fn on_view_changing(&mut self) {
        self.scheduler.request_redraw();
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if let Some(view) = self.view.as_mut() {
            view.pan_by(dx, dy);
            self.on_view_changing();
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if let Some(view) = self.view.as_mut() {
            view.set_zoom(zoom);
            self.on_view_changing();
        }
    }

    /// Pan or zoom ended: repaint and queue a bounds fetch.
    pub fn on_view_settled(&mut self, now: Millis) {
        self.scheduler.request_redraw();
        if let Some(bounds) = self.viewport_bounds() {
            self.coordinator.bounds_settled(bounds, now);
        }
    }

    pub fn on_resize(&mut self, size: PixelSize) {
        if size.is_empty() {
            debug!(?size, "Map container not visible, ignoring resize");
            return;
        }
        self.container = size;
        if let Some(view) = self.view.as_mut() {
            view.resize(size);
        }
        self.sync_canvas_size();
        self.scheduler.request_redraw();
    }

    fn sync_canvas_size(&mut self) {
        if self.canvas.size() != self.container {
            self.canvas.resize(self.container);
        }
    }

    pub fn on_filter_changed(&mut self, filter: ListingFilter, now: Millis) {
        match self.viewport_bounds() {
            Some(bounds) => self.coordinator.set_filter(filter, bounds, now),
            None => debug!("Filter changed before the map has a view"),
        }
    }

    /// Advances timers: touch tooltip expiry and the bounds fetch debounce.
    pub fn tick(&mut self, now: Millis) -> TickOutput {
        TickOutput {
            tooltip: self.tooltip.tick(now),
            fetch: self.coordinator.poll(now),
        }
    }

    pub fn on_fetch_complete(&mut self, completion: FetchCompletion) -> FetchOutcome {
        let outcome = self
            .coordinator
            .complete(completion.epoch, completion.result, &mut self.store);

        match &outcome {
            FetchOutcome::Applied { .. } => {
                self.banner = None;
                self.scheduler.request_redraw();
            }
            FetchOutcome::Failed(e) => {
                let err = AppError::from(e.clone());
                self.banner = Some(error_banner(&err, !self.store.is_empty()).into_string());
            }
            FetchOutcome::StaleDiscarded => {}
        }

        outcome
    }

    /// The animation frame fired. Repaints at most once, and only when a
    /// redraw is pending and the map is ready.
    pub fn on_animation_frame(&mut self) -> Option<RepaintStats> {
        self.scheduler.take_frame()?;

        let view = match (&self.view, self.ready) {
            (Some(view), true) => view,
            _ => {
                debug!("Frame before map is ready, skipping paint");
                return None;
            }
        };

        Some(
            self.renderer
                .repaint(&mut self.canvas, view, self.store.get_all()),
        )
    }

    pub fn on_pointer_move(&mut self, now: Millis, sample: PointerSample) -> TooltipUpdate {
        match &self.view {
            Some(view) => self
                .tooltip
                .pointer_moved(now, sample, self.store.get_all(), view),
            None => TooltipUpdate::Unchanged,
        }
    }

    pub fn on_touch(&mut self, now: Millis, sample: PointerSample) -> TooltipUpdate {
        match &self.view {
            Some(view) => self.tooltip.touched(now, sample, self.store.get_all(), view),
            None => TooltipUpdate::Unchanged,
        }
    }

    pub fn on_pointer_leave(&mut self) -> TooltipUpdate {
        self.tooltip.hide()
    }
}
