// src/render/surface.rs

use super::Rgb;
use crate::geometry::{PixelSize, ScreenPoint};
use image::{ImageFormat, ImageResult, Rgba, RgbaImage};
use std::io::{Seek, Write};
use std::path::Path;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A paintable overlay sized to the map container.
pub trait Surface {
    fn size(&self) -> PixelSize;
    fn resize(&mut self, size: PixelSize);
    fn clear(&mut self);
    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgb);
}

/// In-memory RGBA raster. Unpainted pixels stay transparent so the map shows through.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelCanvas {
    image: RgbaImage,
}

impl PixelCanvas {
    pub fn new(size: PixelSize) -> Self {
        Self {
            image: RgbaImage::new(size.width, size.height),
        }
    }

    /// Color at `(x, y)`, or `None` when transparent or out of range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        let Rgba([r, g, b, a]) = *self.image.get_pixel_checked(x, y)?;
        (a != 0).then_some(Rgb::new(r, g, b))
    }

    pub fn painted_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p[3] != 0).count()
    }

    /// The layer flattened onto an opaque `background`.
    pub fn flatten(&self, background: Rgb) -> RgbaImage {
        let bg = Rgba([background.r, background.g, background.b, 255]);
        RgbaImage::from_fn(self.image.width(), self.image.height(), |x, y| {
            let p = *self.image.get_pixel(x, y);
            if p[3] == 0 {
                bg
            } else {
                p
            }
        })
    }

    /// Encodes the flattened layer as PNG.
    pub fn write_png<W: Write + Seek>(&self, out: &mut W, background: Rgb) -> ImageResult<()> {
        self.flatten(background).write_to(out, ImageFormat::Png)
    }

    /// Saves the flattened layer; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>, background: Rgb) -> ImageResult<()> {
        self.flatten(background).save(path)
    }
}

impl Surface for PixelCanvas {
    fn size(&self) -> PixelSize {
        let (width, height) = self.image.dimensions();
        PixelSize::new(width, height)
    }

    fn resize(&mut self, size: PixelSize) {
        self.image = RgbaImage::new(size.width, size.height);
    }

    fn clear(&mut self) {
        self.image.pixels_mut().for_each(|p| *p = TRANSPARENT);
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgb) {
        if self.size().is_empty() || radius <= 0.0 {
            return;
        }

        let max_x = f64::from(self.image.width() - 1);
        let max_y = f64::from(self.image.height() - 1);
        let x0 = (center.x - radius).floor().clamp(0.0, max_x) as u32;
        let x1 = (center.x + radius).ceil().clamp(0.0, max_x) as u32;
        let y0 = (center.y - radius).floor().clamp(0.0, max_y) as u32;
        let y1 = (center.y + radius).ceil().clamp(0.0, max_y) as u32;

        let fill = Rgba([color.r, color.g, color.b, 255]);
        let r2 = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                // sample at the pixel center
                let dx = f64::from(x) + 0.5 - center.x;
                let dy = f64::from(y) + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.image.put_pixel(x, y, fill);
                }
            }
        }
    }
}
