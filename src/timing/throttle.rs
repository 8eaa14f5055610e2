use super::Millis;

/// Leading-edge rate limit: at most one acquisition per `interval`.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Millis,
    last: Option<Millis>,
}

impl Throttle {
    pub fn new(interval: Millis) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn try_acquire(&mut self, now: Millis) -> bool {
        match self.last {
            Some(last) if now.saturating_sub(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_calls_inside_the_interval() {
        let mut t = Throttle::new(50);
        assert!(t.try_acquire(0));
        assert!(!t.try_acquire(10));
        assert!(!t.try_acquire(49));
        assert!(t.try_acquire(50));
        assert!(!t.try_acquire(60));
        assert!(t.try_acquire(200));
    }
}
