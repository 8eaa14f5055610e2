pub mod components;

// Re-exports for convenience
pub use components::{error_banner, tooltip_body};
