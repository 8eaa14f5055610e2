//! Heat-map overlay for a real-estate listing browser.
//!
//! Listings fetched from the remote API are derived into price-trend markers and
//! painted onto a raster layer that tracks an interactive Web-Mercator map view.
//! Everything runs on one logical thread; network completions are fed back into
//! [`app::HeatmapApp`] by whoever drives the event loop.

pub mod api;
pub mod app;
pub mod config;
pub mod coordinator;
pub mod db;
pub mod domain;
pub mod errors;
pub mod geometry;
pub mod interaction;
pub mod render;
pub mod store;
pub mod templates;
pub mod timing;

pub use app::HeatmapApp;
pub use config::Config;
pub use errors::AppError;

#[cfg(test)]
mod tests;
