mod bounds;
mod map_view;
mod projection;

pub use bounds::ViewportBounds;
pub use map_view::{MapView, MAX_ZOOM, MIN_ZOOM};
pub use projection::{LatLon, PixelSize, Projection, ScreenPoint};
