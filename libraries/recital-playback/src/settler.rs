//! Seek settling
//!
//! Media transports seek asynchronously and imprecisely: after requesting
//! a position the reported value may lag or jitter for several
//! position-update events, and some transports silently clamp or round.
//! [`SeekSettler`] converges on the requested start with a bounded re-seek
//! budget so playback start is never blocked indefinitely; [`SeekWait`]
//! bounds the wait for the transport's seek-completed signal.

use std::time::{Duration, Instant};
use tracing::debug;

/// Magnitude of the gap between two positions.
pub fn delta(a: Duration, b: Duration) -> Duration {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// What the settle watcher decided after seeing a position report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleVerdict {
    /// Position is within tolerance; detach the watcher
    Settled,

    /// Still off target with budget remaining; re-issue the seek
    Retry,

    /// Attempt budget exhausted; detach and let playback run from
    /// wherever the transport landed
    GaveUp,
}

/// Bounded-retry convergence watcher for one requested start position.
#[derive(Debug)]
pub struct SeekSettler {
    target: Duration,
    tolerance: Duration,
    attempts: u8,
    max_attempts: u8,
}

impl SeekSettler {
    /// Create a watcher converging on `target`.
    pub fn new(target: Duration, tolerance: Duration, max_attempts: u8) -> Self {
        Self {
            target,
            tolerance,
            attempts: 0,
            max_attempts,
        }
    }

    /// The position being converged on.
    pub fn target(&self) -> Duration {
        self.target
    }

    /// Re-seeks issued so far.
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    /// Judge a reported position.
    ///
    /// [`SettleVerdict::Retry`] consumes one attempt; the caller issues
    /// the actual seek. Both terminal verdicts mean the watcher must be
    /// detached.
    pub fn observe(&mut self, position: Duration) -> SettleVerdict {
        if delta(position, self.target) <= self.tolerance {
            debug!(
                attempts = self.attempts,
                target_secs = self.target.as_secs_f64(),
                "seek settled within tolerance"
            );
            return SettleVerdict::Settled;
        }

        if self.attempts >= self.max_attempts {
            debug!(
                target_secs = self.target.as_secs_f64(),
                "seek settle budget exhausted"
            );
            return SettleVerdict::GaveUp;
        }

        self.attempts += 1;
        SettleVerdict::Retry
    }
}

/// Pending wait for the transport's seek-completed signal.
///
/// Some transports never deliver the signal (or deliver it before the
/// listener attaches), so the wait carries a deadline after which playback
/// commences anyway.
#[derive(Debug)]
pub struct SeekWait {
    target: Duration,
    deadline: Instant,
}

impl SeekWait {
    /// Start waiting for a seek toward `target` to land.
    pub fn new(target: Duration, now: Instant, timeout: Duration) -> Self {
        Self {
            target,
            deadline: now + timeout,
        }
    }

    /// The position the pending seek was aimed at.
    pub fn target(&self) -> Duration {
        self.target
    }

    /// Whether the fallback deadline has passed.
    pub fn expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: Duration = Duration::from_millis(50);

    #[test]
    fn settles_immediately_within_tolerance() {
        let mut settler = SeekSettler::new(Duration::from_secs(12), TOLERANCE, 8);

        assert_eq!(
            settler.observe(Duration::from_secs_f64(12.04)),
            SettleVerdict::Settled
        );
        assert_eq!(settler.attempts(), 0);
    }

    #[test]
    fn retries_until_within_tolerance() {
        let mut settler = SeekSettler::new(Duration::from_secs(12), TOLERANCE, 8);

        assert_eq!(
            settler.observe(Duration::from_secs(13)),
            SettleVerdict::Retry
        );
        assert_eq!(
            settler.observe(Duration::from_secs_f64(12.3)),
            SettleVerdict::Retry
        );
        assert_eq!(
            settler.observe(Duration::from_secs_f64(12.01)),
            SettleVerdict::Settled
        );
        assert_eq!(settler.attempts(), 2);
    }

    #[test]
    fn gives_up_after_attempt_budget() {
        let mut settler = SeekSettler::new(Duration::from_secs(12), TOLERANCE, 8);
        let off_target = Duration::from_secs(20);

        for _ in 0..8 {
            assert_eq!(settler.observe(off_target), SettleVerdict::Retry);
        }
        assert_eq!(settler.observe(off_target), SettleVerdict::GaveUp);
        assert_eq!(settler.attempts(), 8);
    }

    #[test]
    fn tolerance_is_inclusive() {
        let mut settler = SeekSettler::new(Duration::from_secs(12), TOLERANCE, 8);

        assert_eq!(
            settler.observe(Duration::from_secs(12) + TOLERANCE),
            SettleVerdict::Settled
        );
    }

    #[test]
    fn wait_expires_only_at_deadline() {
        let now = Instant::now();
        let wait = SeekWait::new(Duration::from_secs(3), now, Duration::from_millis(150));

        assert!(!wait.expired(now));
        assert!(!wait.expired(now + Duration::from_millis(149)));
        assert!(wait.expired(now + Duration::from_millis(150)));
        assert_eq!(wait.target(), Duration::from_secs(3));
    }

    #[test]
    fn delta_is_symmetric() {
        let a = Duration::from_secs_f64(1.25);
        let b = Duration::from_secs_f64(4.5);

        assert_eq!(delta(a, b), delta(b, a));
        assert_eq!(delta(a, a), Duration::ZERO);
    }
}
