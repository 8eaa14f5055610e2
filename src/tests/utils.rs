// src/tests/utils.rs

use crate::api::{ApiError, ListingQuery, ListingSource, ListingsPage};
use crate::config::Config;
use crate::db::{init_db, Database};
use crate::domain::{ListingRecord, ListingStatus};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fresh snapshot cache in the temp dir, unique per call.
pub fn make_db(tag: &str) -> Database {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!(
        "estate_heatmap_{tag}_{}_{nanos}.sqlite3",
        std::process::id()
    ));

    let db = Database::new(path);
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

pub fn record(id: &str, lat: f64, lon: f64, prices: &[&str]) -> ListingRecord {
    ListingRecord {
        id: Some(id.to_string()),
        lat,
        lon,
        beds: 3,
        baths: 2.0,
        size_sqft: Some(1_400.0),
        listing_type: ListingStatus::Active,
        address: format!("{id} Test Street"),
        description: None,
        year_built: Some(1990),
        home_type: Some("House".into()),
        garage: true,
        garden: false,
        prices: prices.iter().map(|p| p.to_string()).collect(),
    }
}

pub fn page(records: Vec<ListingRecord>) -> ListingsPage {
    ListingsPage::new(records.len() as u64, records)
}

pub fn test_config() -> Config {
    Config {
        bounds_debounce: 400,
        pointer_throttle: 50,
        request_timeout: 5_000,
        fetch_limit: 300,
        ..Config::default()
    }
}

/// Replays canned responses in order and records every query it sees.
#[derive(Default)]
pub struct ScriptedSource {
    responses: RefCell<VecDeque<Result<ListingsPage, ApiError>>>,
    seen: RefCell<Vec<ListingQuery>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<ListingsPage, ApiError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.borrow().len()
    }

    pub fn queries(&self) -> Vec<ListingQuery> {
        self.seen.borrow().clone()
    }
}

impl ListingSource for ScriptedSource {
    fn fetch(&self, query: &ListingQuery) -> Result<ListingsPage, ApiError> {
        self.seen.borrow_mut().push(query.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response left".into())))
    }
}
