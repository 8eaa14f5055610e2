// src/interaction/tooltip.rs

use crate::domain::{DerivedListing, ListingKey};
use crate::geometry::{PixelSize, Projection, ScreenPoint};
use crate::templates::tooltip_body;
use crate::timing::{Millis, Throttle};
use std::sync::Arc;

pub const POINTER_HIT_RADIUS: f64 = 15.0;
/// Fingers are less precise than a mouse.
pub const TOUCH_HIT_RADIUS: f64 = 20.0;

pub const TOOLTIP_WIDTH: f64 = 200.0;
pub const TOOLTIP_HEIGHT: f64 = 95.0;
pub const TOOLTIP_OFFSET: f64 = 15.0;

pub const TOUCH_AUTO_HIDE: Millis = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pointer,
    Touch,
}

impl InputKind {
    pub fn hit_radius(self) -> f64 {
        match self {
            InputKind::Pointer => POINTER_HIT_RADIUS,
            InputKind::Touch => TOUCH_HIT_RADIUS,
        }
    }
}

/// One pointer or touch position, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub client: ScreenPoint,
    /// Top-left corner of the map container in window coordinates.
    pub container_origin: ScreenPoint,
    /// Size of the browser viewport, used to keep the tooltip on screen.
    pub window: PixelSize,
}

impl PointerSample {
    fn in_container(&self) -> ScreenPoint {
        ScreenPoint::new(
            self.client.x - self.container_origin.x,
            self.client.y - self.container_origin.y,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub key: ListingKey,
    pub left: f64,
    pub top: f64,
    pub html: String,
    /// Set for touch tooltips, which hide on their own.
    pub hide_at: Option<Millis>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TooltipUpdate {
    /// Event was throttled or nothing changed.
    Unchanged,
    Show(Tooltip),
    Hide,
}

/// Nearest listing whose marker lies strictly within `radius` of `at`.
///
/// Equidistant candidates resolve to the one encountered first.
pub fn hit_test<'a, P>(
    listings: &'a [Arc<DerivedListing>],
    projection: &P,
    at: ScreenPoint,
    radius: f64,
) -> Option<&'a Arc<DerivedListing>>
where
    P: Projection + ?Sized,
{
    let mut best: Option<(&Arc<DerivedListing>, f64)> = None;

    for listing in listings {
        let d = projection.project(listing.position()).distance_to(at);
        if d >= radius {
            continue;
        }
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((listing, d));
        }
    }

    best.map(|(listing, _)| listing)
}

/// Top-left corner for the tooltip box, kept inside the window.
///
/// The box sits below-right of the pointer, flips left/up when it would run
/// off the right/bottom edge, and falls back to half its size from the edge if
/// flipping pushes it past the left/top.
pub fn place_tooltip(client: ScreenPoint, window: PixelSize) -> (f64, f64) {
    let mut left = client.x + TOOLTIP_OFFSET;
    let mut top = client.y + TOOLTIP_OFFSET;

    if left + TOOLTIP_WIDTH > f64::from(window.width) {
        left = client.x - TOOLTIP_WIDTH - TOOLTIP_OFFSET;
    }
    if top + TOOLTIP_HEIGHT > f64::from(window.height) {
        top = client.y - TOOLTIP_HEIGHT - TOOLTIP_OFFSET;
    }

    if left < 0.0 {
        left = TOOLTIP_WIDTH / 2.0;
    }
    if top < 0.0 {
        top = TOOLTIP_HEIGHT / 2.0;
    }

    (left, top)
}

/// Hover/touch detail tooltip over the heat layer. Independent of painting:
/// it projects listings itself on each event.
#[derive(Debug)]
pub struct TooltipLayer {
    throttle: Throttle,
    visible: Option<Tooltip>,
}

impl TooltipLayer {
    pub fn new(pointer_throttle: Millis) -> Self {
        Self {
            throttle: Throttle::new(pointer_throttle),
            visible: None,
        }
    }

    pub fn visible(&self) -> Option<&Tooltip> {
        self.visible.as_ref()
    }

    /// Mouse movement. Rate limited; hides as soon as nothing is under the pointer.
    pub fn pointer_moved<P>(
        &mut self,
        now: Millis,
        sample: PointerSample,
        listings: &[Arc<DerivedListing>],
        projection: &P,
    ) -> TooltipUpdate
    where
        P: Projection + ?Sized,
    {
        if !self.throttle.try_acquire(now) {
            return TooltipUpdate::Unchanged;
        }
        self.show_at(sample, listings, projection, InputKind::Pointer, None)
    }

    /// A tap. The tooltip stays up for [`TOUCH_AUTO_HIDE`] unless replaced.
    pub fn touched<P>(
        &mut self,
        now: Millis,
        sample: PointerSample,
        listings: &[Arc<DerivedListing>],
        projection: &P,
    ) -> TooltipUpdate
    where
        P: Projection + ?Sized,
    {
        self.show_at(
            sample,
            listings,
            projection,
            InputKind::Touch,
            Some(now + TOUCH_AUTO_HIDE),
        )
    }

    /// Expires touch tooltips.
    pub fn tick(&mut self, now: Millis) -> TooltipUpdate {
        match self.visible.as_ref().and_then(|t| t.hide_at) {
            Some(hide_at) if now >= hide_at => self.hide(),
            _ => TooltipUpdate::Unchanged,
        }
    }

    pub fn hide(&mut self) -> TooltipUpdate {
        if self.visible.take().is_some() {
            TooltipUpdate::Hide
        } else {
            TooltipUpdate::Unchanged
        }
    }

    fn show_at<P>(
        &mut self,
        sample: PointerSample,
        listings: &[Arc<DerivedListing>],
        projection: &P,
        kind: InputKind,
        hide_at: Option<Millis>,
    ) -> TooltipUpdate
    where
        P: Projection + ?Sized,
    {
        let Some(listing) = hit_test(listings, projection, sample.in_container(), kind.hit_radius())
        else {
            return self.hide();
        };

        let (left, top) = place_tooltip(sample.client, sample.window);
        let tooltip = Tooltip {
            key: listing.key.clone(),
            left,
            top,
            html: tooltip_body(listing).into_string(),
            hide_at,
        };

        if self.visible.as_ref() == Some(&tooltip) {
            return TooltipUpdate::Unchanged;
        }
        self.visible = Some(tooltip.clone());
        TooltipUpdate::Show(tooltip)
    }
}
