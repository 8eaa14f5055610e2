use super::LatLon;
use geo::{coord, Rect};

/// The geographic rectangle currently visible on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl ViewportBounds {
    /// Builds bounds from any two opposite corners.
    pub fn from_corners(a: LatLon, b: LatLon) -> Self {
        let rect = Rect::new(coord! { x: a.lon, y: a.lat }, coord! { x: b.lon, y: b.lat });
        Self::from_rect(rect)
    }

    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lng: rect.min().x,
            max_lng: rect.max().x,
        }
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_lng, y: self.min_lat },
            coord! { x: self.max_lng, y: self.max_lat },
        )
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: LatLon) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lng
            && point.lon <= self.max_lng
    }

    pub fn center(&self) -> LatLon {
        let c = self.to_rect().center();
        LatLon::new(c.y, c.x)
    }

    /// Query parameters understood by the listings API.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("minLat", self.min_lat.to_string()),
            ("maxLat", self.max_lat.to_string()),
            ("minLng", self.min_lng.to_string()),
            ("maxLng", self.max_lng.to_string()),
        ]
    }
}
