// src/timing/debounce.rs

use super::Millis;

/// Trailing-edge debounce: a burst of pushes collapses into the last value,
/// released once `delay` has passed without another push.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Millis,
    pending: Option<(T, Millis)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Millis) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the quiet period.
    pub fn push(&mut self, value: T, now: Millis) {
        self.pending = Some((value, now));
    }

    /// Releases the pending value if the quiet period has elapsed.
    pub fn poll(&mut self, now: Millis) -> Option<T> {
        match &self.pending {
            Some((_, pushed_at)) if now.saturating_sub(*pushed_at) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Millis> {
        self.pending.as_ref().map(|(_, at)| at + self.delay)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_last_value() {
        let mut d = Debouncer::new(400);
        d.push(1, 0);
        d.push(2, 100);
        d.push(3, 350);
        assert_eq!(d.poll(700), None);
        assert_eq!(d.deadline(), Some(750));
        assert_eq!(d.poll(750), Some(3));
        assert_eq!(d.poll(2000), None);
    }

    #[test]
    fn nothing_pushed_nothing_released() {
        let mut d: Debouncer<u8> = Debouncer::new(10);
        assert_eq!(d.poll(1_000), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn cancel_discards_pending() {
        let mut d = Debouncer::new(10);
        d.push("a", 0);
        assert_eq!(d.cancel(), Some("a"));
        assert_eq!(d.poll(100), None);
    }
}
