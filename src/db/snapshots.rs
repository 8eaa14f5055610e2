// src/db/snapshots.rs

use super::{CacheError, Database};
use crate::domain::ListingRecord;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

pub const SNAPSHOT_KEY: &str = "houseData";

/// The last successful bulk fetch, as stored locally.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSnapshot {
    pub records: Vec<ListingRecord>,
    pub total_count: u64,
    pub saved_at_ms: i64,
}

pub fn save_snapshot(
    db: &Database,
    records: &[ListingRecord],
    total_count: u64,
    now_ms: i64,
) -> Result<(), CacheError> {
    let payload = serde_json::to_string(records)?;

    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO listing_snapshots (key, payload, total_count, saved_at_ms)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                total_count = excluded.total_count,
                saved_at_ms = excluded.saved_at_ms
            "#,
            params![SNAPSHOT_KEY, payload, total_count as i64, now_ms],
        )?;
        Ok(())
    })?;

    debug!(records = records.len(), "Listing snapshot saved");
    Ok(())
}

/// Returns the stored snapshot if it is no older than `max_age_ms`.
pub fn load_fresh_snapshot(
    db: &Database,
    now_ms: i64,
    max_age_ms: u64,
) -> Result<Option<ListingSnapshot>, CacheError> {
    let row = db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT payload, total_count, saved_at_ms FROM listing_snapshots WHERE key = ?1",
                params![SNAPSHOT_KEY],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;
        Ok(row)
    })?;

    let Some((payload, total_count, saved_at_ms)) = row else {
        return Ok(None);
    };

    let age = now_ms.saturating_sub(saved_at_ms);
    if age > max_age_ms as i64 {
        debug!(age_ms = age, "Listing snapshot too old");
        return Ok(None);
    }

    let records: Vec<ListingRecord> = serde_json::from_str(&payload)?;
    Ok(Some(ListingSnapshot {
        records,
        total_count: total_count.max(0) as u64,
        saved_at_ms,
    }))
}
