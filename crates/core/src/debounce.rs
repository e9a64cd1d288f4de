//! Quiet-period gate for search-as-you-type.

use std::time::{Duration, Instant};

/// Default quiet period before a typed query is processed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds the latest pushed value until no new value arrived for `delay`.
///
/// Time is passed in by the caller so the gate can be driven from a UI tick.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    /// Gate with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value and restart the quiet period at `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Release the pending value once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(
            &self.pending,
            Some((_, since)) if now.saturating_duration_since(*since) >= self.delay
        );
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_only_after_quiet_period() {
        let start = Instant::now();
        let mut gate = Debouncer::new(Duration::from_millis(300));

        gate.push("z", start);
        gate.push("ze", start + Duration::from_millis(100));
        gate.push("zel", start + Duration::from_millis(200));

        assert_eq!(gate.poll(start + Duration::from_millis(400)), None);
        assert_eq!(gate.poll(start + Duration::from_millis(500)), Some("zel"));
        assert_eq!(gate.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn cancel_discards_pending_value() {
        let start = Instant::now();
        let mut gate = Debouncer::default();
        gate.push(1, start);
        assert!(gate.is_pending());
        gate.cancel();
        assert_eq!(gate.poll(start + Duration::from_secs(1)), None);
    }
}
