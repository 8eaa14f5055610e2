// src/api/client.rs

use super::{ApiError, ListingQuery, ListingsPage};
use rand::Rng;
use reqwest::blocking::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("estate-heatmap/", env!("CARGO_PKG_VERSION"));

/// Anything that can answer a listings query.
pub trait ListingSource {
    fn fetch(&self, query: &ListingQuery) -> Result<ListingsPage, ApiError>;
}

/// Blocking HTTP client for the remote listings API.
pub struct HttpListingSource {
    client: Client,
    endpoint: url::Url,
}

impl HttpListingSource {
    pub fn new(endpoint: url::Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

impl ListingSource for HttpListingSource {
    fn fetch(&self, query: &ListingQuery) -> Result<ListingsPage, ApiError> {
        let start = Instant::now();

        let resp = self
            .client
            .get(self.endpoint.clone())
            .query(&query.query_pairs())
            .send()?;

        let status = resp.status();
        let text = resp.text()?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let page: ListingsPage =
            serde_json::from_str(&text).map_err(|e| ApiError::JsonParse(e.to_string()))?;

        debug!(
            records = page.data.len(),
            count = page.count,
            elapsed = ?start.elapsed(),
            "Listings response parsed"
        );

        Ok(page)
    }
}

/// Backoff schedule for the startup bulk load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
    pub max_backoff: Duration,
    pub max_jitter: Duration,
}

impl RetryPolicy {
    pub fn bulk_load() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(1),
            max_backoff: Duration::from_secs(5),
            max_jitter: Duration::from_millis(500),
        }
    }

    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            backoff_step: Duration::ZERO,
            max_backoff: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    fn delay_after<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        let base = (self.backoff_step * attempt).min(self.max_backoff);
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rng.gen_range(0..=jitter_ms)
        };
        base + Duration::from_millis(jitter)
    }
}

/// Runs `query` against `source`, retrying failures per `policy`.
///
/// `sleep` is called between attempts so callers and tests control real waiting.
pub fn fetch_with_retry<S, R, F>(
    source: &S,
    query: &ListingQuery,
    policy: RetryPolicy,
    rng: &mut R,
    mut sleep: F,
) -> Result<ListingsPage, ApiError>
where
    S: ListingSource + ?Sized,
    R: Rng,
    F: FnMut(Duration),
{
    let mut last_err = None;

    for attempt in 1..=policy.max_attempts.max(1) {
        match source.fetch(query) {
            Ok(page) => {
                if attempt > 1 {
                    info!(attempt, "✅ Listings fetch recovered");
                }
                return Ok(page);
            }
            Err(e) => {
                warn!(attempt, error = %e, "⚠️ Listings fetch failed");
                last_err = Some(e);

                if attempt < policy.max_attempts {
                    sleep(policy.delay_after(attempt, rng));
                }
            }
        }
    }

    Err(last_err.unwrap_or_else(|| ApiError::Network("retry loop made no attempts".into())))
}
