//! Debouncing for free-text search input.
//!
//! [`Debounced`] is a clock-driven state machine: callers own the clock and
//! poll it from their tick loop (the TUI driver, the list controller).

use std::time::Duration;

use tokio::time::Instant;

/// Holds the latest input until it has been stable for `delay`.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounced<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new input, replacing any pending one and restarting the delay.
    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Release the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// When the pending value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending value immediately (e.g. on Enter).
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn test_burst_collapses_to_last_value() {
        let start = Instant::now();
        let mut search = Debounced::new(DELAY);

        search.input("a", start);
        search.input("ac", start + Duration::from_millis(100));
        search.input("acme", start + Duration::from_millis(200));

        assert_eq!(search.poll(start + Duration::from_millis(600)), None);
        assert_eq!(search.poll(start + Duration::from_millis(700)), Some("acme"));
        assert_eq!(search.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_deadline_moves_with_each_input() {
        let start = Instant::now();
        let mut search = Debounced::new(DELAY);
        assert_eq!(search.deadline(), None);

        search.input(1, start);
        assert_eq!(search.deadline(), Some(start + DELAY));
        search.input(2, start + Duration::from_millis(300));
        assert_eq!(search.deadline(), Some(start + Duration::from_millis(800)));
    }

    #[test]
    fn test_flush_releases_immediately() {
        let mut search = Debounced::new(DELAY);
        search.input("acme", Instant::now());
        assert_eq!(search.flush(), Some("acme"));
        assert!(!search.is_pending());
    }
}
