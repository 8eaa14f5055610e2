// src/geometry/projection.rs

use super::ViewportBounds;
use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A position in container pixels, origin at the top-left corner of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: ScreenPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Hidden panels report a zero-sized container.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The only source of truth for where a coordinate renders right now.
///
/// Implementations must read live pan/zoom state on every call; callers never
/// cache projected points across view changes.
pub trait Projection {
    fn project(&self, coord: LatLon) -> ScreenPoint;

    /// Pixel size of the visible map container.
    fn pixel_size(&self) -> PixelSize;

    /// Geographic rectangle currently visible.
    fn bounds(&self) -> ViewportBounds;
}
