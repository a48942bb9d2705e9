//! Clock

use jiff::{SignedDuration, Timestamp};

/// Source of the current time for checkout timestamps.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that always reads the same instant unless moved with [`FixedClock::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: Timestamp,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    #[must_use]
    pub fn new(now: Timestamp) -> Self {
        Self { now }
    }

    /// Move the clock forward, saturating at the maximum timestamp.
    pub fn advance(&mut self, by: SignedDuration) {
        self.now = self.now.saturating_add(by).unwrap_or(Timestamp::MAX);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reads_the_same_instant() {
        let clock = FixedClock::new(Timestamp::UNIX_EPOCH);

        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), Timestamp::UNIX_EPOCH);
    }

    #[test]
    fn fixed_clock_advances() {
        let mut clock = FixedClock::new(Timestamp::UNIX_EPOCH);
        clock.advance(SignedDuration::from_secs(90));

        assert_eq!(clock.now().as_second(), 90);
    }
}
