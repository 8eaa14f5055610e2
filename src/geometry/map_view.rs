// src/geometry/map_view.rs

use super::{LatLon, PixelSize, Projection, ScreenPoint, ViewportBounds};
use std::f64::consts::PI;

pub const MIN_ZOOM: f64 = 5.0;
pub const MAX_ZOOM: f64 = 9.0;

const TILE_SIZE: f64 = 256.0;
const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Spherical Web-Mercator view over a pixel container, the same math the tile
/// map uses for `latLngToContainerPoint`.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    center: LatLon,
    zoom: f64,
    size: PixelSize,
}

impl MapView {
    pub fn new(center: LatLon, zoom: f64, size: PixelSize) -> Self {
        Self {
            center: clamp_lat(center),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            size,
        }
    }

    pub fn center(&self) -> LatLon {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_view(&mut self, center: LatLon, zoom: f64) {
        self.center = clamp_lat(center);
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn resize(&mut self, size: PixelSize) {
        self.size = size;
    }

    /// Moves the view by a pixel offset; positive `dx` pans east, positive `dy` south.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.world_pixel(self.center);
        self.center = self.unproject_world(cx + dx, cy + dy);
    }

    /// Inverse of [`Projection::project`].
    pub fn unproject(&self, point: ScreenPoint) -> LatLon {
        let (ox, oy) = self.pixel_origin();
        self.unproject_world(point.x + ox, point.y + oy)
    }

    fn scale(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    fn world_pixel(&self, coord: LatLon) -> (f64, f64) {
        let scale = self.scale();
        let lat = coord.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = scale * (coord.lon / 360.0 + 0.5);
        let y = scale * (0.5 - (PI / 4.0 + lat / 2.0).tan().ln() / (2.0 * PI));
        (x, y)
    }

    fn unproject_world(&self, x: f64, y: f64) -> LatLon {
        let scale = self.scale();
        let lon = x / scale * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y / scale)).sinh().atan().to_degrees();
        LatLon::new(lat, lon)
    }

    /// World pixel of the container's top-left corner.
    fn pixel_origin(&self) -> (f64, f64) {
        let (cx, cy) = self.world_pixel(self.center);
        (
            cx - f64::from(self.size.width) / 2.0,
            cy - f64::from(self.size.height) / 2.0,
        )
    }
}

fn clamp_lat(coord: LatLon) -> LatLon {
    LatLon::new(coord.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), coord.lon)
}

impl Projection for MapView {
    fn project(&self, coord: LatLon) -> ScreenPoint {
        let (x, y) = self.world_pixel(coord);
        let (ox, oy) = self.pixel_origin();
        ScreenPoint::new(x - ox, y - oy)
    }

    fn pixel_size(&self) -> PixelSize {
        self.size
    }

    fn bounds(&self) -> ViewportBounds {
        let nw = self.unproject(ScreenPoint::new(0.0, 0.0));
        let se = self.unproject(ScreenPoint::new(
            f64::from(self.size.width),
            f64::from(self.size.height),
        ));
        ViewportBounds::from_corners(nw, se)
    }
}
