/// Identifies one issued fetch. Only the most recent epoch may touch the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Epoch(u64);

impl Epoch {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter. Advancing it is how an in-flight request is
/// "cancelled": its completion will no longer match.
#[derive(Debug, Default)]
pub struct EpochCounter {
    current: u64,
}

impl EpochCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) -> Epoch {
        self.current += 1;
        Epoch(self.current)
    }

    pub fn current(&self) -> Epoch {
        Epoch(self.current)
    }

    pub fn is_current(&self, epoch: Epoch) -> bool {
        epoch.0 == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_epoch_is_current() {
        let mut counter = EpochCounter::new();
        let a = counter.advance();
        let b = counter.advance();
        assert!(a < b);
        assert!(!counter.is_current(a));
        assert!(counter.is_current(b));
    }
}
