pub mod connection;
pub mod snapshots;

pub use connection::{init_db, Database};
pub use snapshots::{load_fresh_snapshot, save_snapshot, ListingSnapshot, SNAPSHOT_KEY};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("Snapshot (de)serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
