// src/api/background.rs

use super::{ApiError, ListingSource, ListingsPage};
use crate::coordinator::{Epoch, FetchTicket};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A finished bounds fetch, tagged with the epoch it was issued under.
#[derive(Debug)]
pub struct FetchCompletion {
    pub epoch: Epoch,
    pub result: Result<ListingsPage, ApiError>,
}

/// Runs fetch tickets on worker threads and hands results back over a channel,
/// so the owning thread never blocks on the network.
pub struct BackgroundFetcher {
    source: Arc<dyn ListingSource + Send + Sync>,
    tx: Sender<FetchCompletion>,
    rx: Receiver<FetchCompletion>,
}

impl BackgroundFetcher {
    pub fn new(source: Arc<dyn ListingSource + Send + Sync>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { source, tx, rx }
    }

    pub fn spawn(&self, ticket: FetchTicket) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        std::thread::spawn(move || {
            debug!(epoch = ticket.epoch.value(), "🧵 Fetch thread started");
            let result = source.fetch(&ticket.query);
            let completion = FetchCompletion {
                epoch: ticket.epoch,
                result,
            };
            if tx.send(completion).is_err() {
                warn!(epoch = ticket.epoch.value(), "Fetch finished after receiver dropped");
            }
        });
    }

    /// Next finished fetch, if one is waiting.
    pub fn try_recv(&self) -> Option<FetchCompletion> {
        match self.rx.try_recv() {
            Ok(c) => Some(c),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Waits up to `timeout` for the next finished fetch.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchCompletion> {
        match self.rx.recv_timeout(timeout) {
            Ok(c) => Some(c),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
