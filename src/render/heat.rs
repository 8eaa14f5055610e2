// src/render/heat.rs

use super::{heat_color, Surface};
use crate::domain::DerivedListing;
use crate::geometry::{Projection, ScreenPoint};
use std::sync::Arc;
use tracing::{debug, trace};

pub const MARKER_RADIUS: f64 = 5.0;

/// Points this far outside the container are still drawn so markers don't pop in at the edges.
pub const CULL_MARGIN: f64 = 50.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepaintStats {
    pub drawn: usize,
    pub culled: usize,
}

/// Paints one heat marker per listing in (or near) the visible region.
#[derive(Debug)]
pub struct HeatRenderer {
    radius: f64,
    margin: f64,
    repaints: u64,
    last: RepaintStats,
}

impl Default for HeatRenderer {
    fn default() -> Self {
        Self::new(MARKER_RADIUS, CULL_MARGIN)
    }
}

impl HeatRenderer {
    pub fn new(radius: f64, margin: f64) -> Self {
        Self {
            radius,
            margin,
            repaints: 0,
            last: RepaintStats::default(),
        }
    }

    /// Clears `surface` and redraws every listing whose projected position
    /// falls inside the container grown by the cull margin.
    ///
    /// A zero-sized surface (hidden container) is left untouched.
    pub fn repaint<S, P>(
        &mut self,
        surface: &mut S,
        projection: &P,
        listings: &[Arc<DerivedListing>],
    ) -> RepaintStats
    where
        S: Surface + ?Sized,
        P: Projection + ?Sized,
    {
        let size = surface.size();
        if size.is_empty() {
            trace!("Skipping repaint, surface has no area");
            return RepaintStats::default();
        }

        surface.clear();

        let (w, h) = (f64::from(size.width), f64::from(size.height));
        let visible = |p: &ScreenPoint| {
            p.x >= -self.margin && p.x <= w + self.margin && p.y >= -self.margin && p.y <= h + self.margin
        };

        let mut stats = RepaintStats::default();
        for listing in listings {
            let point = projection.project(listing.position());
            if !visible(&point) {
                stats.culled += 1;
                continue;
            }
            let color = heat_color(listing.percent_change, listing.status());
            surface.fill_circle(point, self.radius, color);
            stats.drawn += 1;
        }

        self.repaints += 1;
        self.last = stats;
        debug!(drawn = stats.drawn, culled = stats.culled, "Heat layer repainted");
        stats
    }

    pub fn repaints(&self) -> u64 {
        self.repaints
    }

    pub fn last_stats(&self) -> RepaintStats {
        self.last
    }
}
