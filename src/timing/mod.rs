mod clock;
mod debounce;
mod throttle;

pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use debounce::Debouncer;
pub use throttle::Throttle;
