mod color;
mod heat;
mod scheduler;
mod surface;

pub use color::{heat_color, Bound, Rgb, COLOR_THRESHOLDS, SOLD_COLOR};
pub use heat::{HeatRenderer, RepaintStats, CULL_MARGIN, MARKER_RADIUS};
pub use scheduler::{FrameHandle, RedrawScheduler};
pub use surface::{PixelCanvas, Surface};
