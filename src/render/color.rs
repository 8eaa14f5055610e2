// src/render/color.rs

use crate::domain::ListingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Upper edge of a threshold bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtMost(f64),
    Below(f64),
}

impl Bound {
    fn admits(&self, change: f64) -> bool {
        match *self {
            Bound::AtMost(limit) => change <= limit,
            Bound::Below(limit) => change < limit,
        }
    }
}

/// Sold listings are drawn neutral whatever their trend.
pub const SOLD_COLOR: Rgb = Rgb::new(40, 40, 40);

/// Anything above the last bound.
const BRIGHTEST_GREEN: Rgb = Rgb::new(0, 255, 0);

/// Checked in order; first admitting bound wins.
pub const COLOR_THRESHOLDS: [(Bound, Rgb); 6] = [
    (Bound::AtMost(-80.0), Rgb::new(160, 0, 0)),
    (Bound::AtMost(-20.0), Rgb::new(233, 62, 58)),
    (Bound::Below(0.0), Rgb::new(255, 165, 0)),
    (Bound::AtMost(20.0), Rgb::new(255, 215, 0)),
    (Bound::AtMost(60.0), Rgb::new(144, 238, 144)),
    (Bound::AtMost(100.0), Rgb::new(27, 138, 90)),
];

pub fn heat_color(percent_change: f64, status: &ListingStatus) -> Rgb {
    if *status == ListingStatus::Sold {
        return SOLD_COLOR;
    }

    COLOR_THRESHOLDS
        .iter()
        .find(|(bound, _)| bound.admits(percent_change))
        .map(|(_, color)| *color)
        .unwrap_or(BRIGHTEST_GREEN)
}
