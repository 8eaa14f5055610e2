mod epoch;
mod viewport;

pub use epoch::{Epoch, EpochCounter};
pub use viewport::{
    CoordinatorSettings, FetchOutcome, FetchPhase, FetchTicket, ViewportCoordinator,
};
