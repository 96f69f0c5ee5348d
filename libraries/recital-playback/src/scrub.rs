//! Scrub planning
//!
//! Pure classification of a user-driven reposition: clamp the requested
//! value to the playable range and decide whether it leaves the active
//! segment. The controller applies the plan (seek, progress write, mode
//! demotion); this module never touches the resource.

use crate::types::Segment;
use std::time::Duration;

/// Resolved scrub request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrubPlan {
    /// Requested value clamped to `[0, duration]`
    pub position: Duration,

    /// Whether the clamped value falls outside the active segment's
    /// bounds, demoting segment playback to full-track playback
    pub exits_segment: bool,
}

/// Plan a scrub to `requested` against a known (or zero, if unknown)
/// duration and the active segment.
pub fn plan_scrub(requested: Duration, duration: Duration, segment: Option<&Segment>) -> ScrubPlan {
    let position = requested.min(duration);
    let exits_segment = segment.is_some_and(|segment| !segment.contains(position));

    ScrubPlan {
        position,
        exits_segment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recital_core::CardKey;

    fn segment(start: f64, end: Option<f64>) -> Segment {
        Segment {
            card: CardKey::from("sequence:1"),
            start: Duration::from_secs_f64(start),
            end: end.map(Duration::from_secs_f64),
        }
    }

    #[test]
    fn clamps_to_duration() {
        let plan = plan_scrub(Duration::from_secs(90), Duration::from_secs(60), None);
        assert_eq!(plan.position, Duration::from_secs(60));
        assert!(!plan.exits_segment);
    }

    #[test]
    fn unknown_duration_clamps_to_zero() {
        let plan = plan_scrub(Duration::from_secs(90), Duration::ZERO, None);
        assert_eq!(plan.position, Duration::ZERO);
    }

    #[test]
    fn inside_segment_is_not_an_exit() {
        let segment = segment(2.0, Some(10.0));
        let plan = plan_scrub(
            Duration::from_secs(7),
            Duration::from_secs(60),
            Some(&segment),
        );

        assert!(!plan.exits_segment);
    }

    #[test]
    fn outside_segment_is_an_exit() {
        let segment = segment(2.0, Some(10.0));

        let past = plan_scrub(
            Duration::from_secs(20),
            Duration::from_secs(60),
            Some(&segment),
        );
        assert!(past.exits_segment);

        let before = plan_scrub(
            Duration::from_secs(1),
            Duration::from_secs(60),
            Some(&segment),
        );
        assert!(before.exits_segment);
    }

    #[test]
    fn endless_segment_only_exits_before_start() {
        let segment = segment(2.0, None);

        let late = plan_scrub(
            Duration::from_secs(59),
            Duration::from_secs(60),
            Some(&segment),
        );
        assert!(!late.exits_segment);

        let early = plan_scrub(Duration::ZERO, Duration::from_secs(60), Some(&segment));
        assert!(early.exits_segment);
    }

    #[test]
    fn clamping_can_pull_a_request_back_inside() {
        // Requested past the end of the track, but the clamp lands on the
        // segment's upper bound.
        let segment = segment(2.0, Some(60.0));
        let plan = plan_scrub(
            Duration::from_secs(90),
            Duration::from_secs(60),
            Some(&segment),
        );

        assert_eq!(plan.position, Duration::from_secs(60));
        assert!(!plan.exits_segment);
    }
}
