pub mod error;
pub mod tooltip;

pub use error::error_banner;
pub use tooltip::tooltip_body;
