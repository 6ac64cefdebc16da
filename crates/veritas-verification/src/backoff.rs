//! Exponential backoff shared by the verifier retry loop and the HTTP client.

use std::time::Duration;

/// Doubling delay sequence capped at `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            next: initial.min(max),
            max,
        }
    }

    pub fn from_millis(initial_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(initial_ms), Duration::from_millis(max_ms))
    }

    /// The delay to sleep now; the following call returns twice as much.
    pub fn next_delay(&mut self) -> Duration {
        let current = self.next;
        self.next = current.saturating_mul(2).min(self.max);
        current
    }

    /// Sleep for the next delay. Zero delays return immediately.
    pub fn wait(&mut self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_until_capped() {
        let mut backoff = Backoff::from_millis(500, 8_000);
        let delays: Vec<u128> = (0..7).map(|_| backoff.next_delay().as_millis()).collect();
        assert_eq!(delays, vec![500, 1_000, 2_000, 4_000, 8_000, 8_000, 8_000]);
    }

    #[test]
    fn zero_stays_zero() {
        let mut backoff = Backoff::from_millis(0, 0);
        assert!(backoff.next_delay().is_zero());
        assert!(backoff.next_delay().is_zero());
    }

    #[test]
    fn initial_above_cap_is_clamped() {
        let mut backoff = Backoff::from_millis(10_000, 2_000);
        assert_eq!(backoff.next_delay(), Duration::from_millis(2_000));
    }
}
