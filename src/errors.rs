// errors.rs
use crate::api::ApiError;
use crate::config::ConfigError;
use crate::db::CacheError;
use thiserror::Error;

/// Errors surfaced by startup and the demo driver; component errors convert in.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl AppError {
    /// Short text safe to show to end users.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(ApiError::Status { status, .. }) => {
                format!("The listings service answered with status {status}. Try again shortly.")
            }
            AppError::Api(ApiError::Network(_)) => {
                "The listings service could not be reached. Check your connection.".to_string()
            }
            AppError::Api(ApiError::JsonParse(_)) => {
                "The listings service sent a response we could not read.".to_string()
            }
            AppError::Api(ApiError::Config(_)) | AppError::Config(_) => {
                "The app is misconfigured.".to_string()
            }
            AppError::Cache(_) | AppError::Io(_) => "Local storage is unavailable.".to_string(),
            AppError::Image(_) => "The heat map image could not be written.".to_string(),
        }
    }
}
