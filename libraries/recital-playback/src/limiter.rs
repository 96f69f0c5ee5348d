//! Boundary limiter
//!
//! The armed watcher that halts segment playback at its end. Arming while
//! already armed is an invariant violation: every caller repositioning the
//! resource for its own reasons must disarm first, otherwise a stale
//! boundary from a previous segment keeps firing.

use std::time::Duration;
use tracing::debug;

/// Armed end-boundary watcher.
///
/// `arm`/`disarm` are the only mutators; the controller consults
/// [`triggered`](BoundaryLimiter::triggered) on every position update.
#[derive(Debug, Default)]
pub struct BoundaryLimiter {
    end: Option<Duration>,
}

impl BoundaryLimiter {
    /// Arm the watcher at `end`.
    pub fn arm(&mut self, end: Duration) {
        debug_assert!(
            self.end.is_none(),
            "limiter must be disarmed before re-arming"
        );
        debug!(end_secs = end.as_secs_f64(), "arming boundary limiter");
        self.end = Some(end);
    }

    /// Disarm the watcher, returning the boundary it held.
    pub fn disarm(&mut self) -> Option<Duration> {
        if let Some(end) = self.end {
            debug!(end_secs = end.as_secs_f64(), "disarming boundary limiter");
        }
        self.end.take()
    }

    /// Whether a boundary is currently armed.
    pub fn is_armed(&self) -> bool {
        self.end.is_some()
    }

    /// Whether `position` has reached or passed the armed boundary.
    pub fn triggered(&self, position: Duration) -> bool {
        self.end.is_some_and(|end| position >= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_limiter_never_triggers() {
        let limiter = BoundaryLimiter::default();
        assert!(!limiter.is_armed());
        assert!(!limiter.triggered(Duration::from_secs(3600)));
    }

    #[test]
    fn triggers_at_and_past_boundary() {
        let mut limiter = BoundaryLimiter::default();
        limiter.arm(Duration::from_secs(18));

        assert!(!limiter.triggered(Duration::from_secs_f64(17.95)));
        assert!(limiter.triggered(Duration::from_secs(18)));
        assert!(limiter.triggered(Duration::from_secs_f64(18.2)));
    }

    #[test]
    fn disarm_returns_boundary_and_clears() {
        let mut limiter = BoundaryLimiter::default();
        limiter.arm(Duration::from_secs(5));

        assert_eq!(limiter.disarm(), Some(Duration::from_secs(5)));
        assert!(!limiter.is_armed());
        assert_eq!(limiter.disarm(), None);
    }

    #[test]
    fn disarm_then_rearm_moves_boundary() {
        let mut limiter = BoundaryLimiter::default();
        limiter.arm(Duration::from_secs(5));
        limiter.disarm();
        limiter.arm(Duration::from_secs(9));

        assert!(!limiter.triggered(Duration::from_secs(6)));
        assert!(limiter.triggered(Duration::from_secs(9)));
    }

    #[test]
    #[should_panic(expected = "disarmed before re-arming")]
    fn arming_twice_is_a_bug() {
        let mut limiter = BoundaryLimiter::default();
        limiter.arm(Duration::from_secs(5));
        limiter.arm(Duration::from_secs(9));
    }
}
