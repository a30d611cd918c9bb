//! The fingertip-to-mouth proximity check.
//!
//! This is the decision core of the application: given the fingertip pixel
//! positions of a hand and the current mouth reference point, measure the
//! Euclidean distance of every fingertip and flag the hand when any of them
//! comes strictly closer than the threshold.

use crate::geometry::{euclidean_distance, FingerTip, PixelPoint};

/// What to do on frames where no face (and therefore no mouth point) was
/// detected while a hand is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouthFallback {
    /// Skip the proximity check entirely until a face reappears
    Skip,
    /// Reuse the last known mouth point, marking the result as stale
    CarryOver,
}

/// Per-frame holder for the mouth reference point.
///
/// `observe` is called exactly once per frame with the mouth point extracted
/// from the face mesh (or `None` when no face was detected); `active`
/// resolves the point to check against under the configured fallback policy.
#[derive(Debug)]
pub struct MouthReference {
    fallback: MouthFallback,
    last: Option<PixelPoint>,
    fresh: bool,
}

impl MouthReference {
    #[must_use]
    pub fn new(fallback: MouthFallback) -> Self {
        Self {
            fallback,
            last: None,
            fresh: false,
        }
    }

    /// Record this frame's mouth observation
    pub fn observe(&mut self, point: Option<PixelPoint>) {
        match point {
            Some(p) => {
                self.last = Some(p);
                self.fresh = true;
            }
            None => self.fresh = false,
        }
    }

    /// The mouth point to check against this frame, with a staleness flag.
    ///
    /// Returns `None` when no usable point exists (no face yet, or the
    /// policy is `Skip` and the face vanished this frame).
    #[must_use]
    pub fn active(&self) -> Option<(PixelPoint, bool)> {
        if self.fresh {
            return self.last.map(|p| (p, false));
        }
        match self.fallback {
            MouthFallback::Skip => None,
            MouthFallback::CarryOver => self.last.map(|p| (p, true)),
        }
    }
}

/// Distance of one fingertip to the mouth reference
#[derive(Debug, Clone, Copy)]
pub struct FingerDistance {
    pub finger: FingerTip,
    pub distance: f32,
}

/// Result of checking one hand against the mouth reference
#[derive(Debug, Clone)]
pub struct ProximityReport {
    /// Per-finger distances in thumb-to-pinky order
    pub distances: Vec<FingerDistance>,
    /// The closest finger and its distance
    pub nearest: Option<FingerDistance>,
    /// True when at least one fingertip is strictly inside the threshold
    pub triggered: bool,
    /// 1.0 at contact, falling linearly to 0.0 at the threshold
    pub confidence: f32,
    /// True when the mouth point was carried over from an earlier frame
    pub stale: bool,
}

/// Threshold-based proximity checker
#[derive(Debug, Clone, Copy)]
pub struct ProximityChecker {
    threshold_px: f32,
}

impl ProximityChecker {
    #[must_use]
    pub fn new(threshold_px: f32) -> Self {
        Self { threshold_px }
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold_px
    }

    /// Check a hand's fingertips against the mouth point.
    ///
    /// A fingertip triggers iff its distance is strictly less than the
    /// threshold; a distance exactly at the threshold does not.
    #[must_use]
    pub fn check(&self, fingertips: &[(FingerTip, PixelPoint)], mouth: PixelPoint, stale: bool) -> ProximityReport {
        let distances: Vec<FingerDistance> = fingertips
            .iter()
            .map(|&(finger, point)| FingerDistance {
                finger,
                distance: euclidean_distance(point, mouth),
            })
            .collect();

        let nearest = distances
            .iter()
            .copied()
            .min_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));

        let triggered = nearest.is_some_and(|n| n.distance < self.threshold_px);

        let confidence = nearest.map_or(0.0, |n| {
            if self.threshold_px > 0.0 {
                (1.0 - n.distance / self.threshold_px).clamp(0.0, 1.0)
            } else {
                0.0
            }
        });

        ProximityReport {
            distances,
            nearest,
            triggered,
            confidence,
            stale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tips(points: &[(FingerTip, (f32, f32))]) -> Vec<(FingerTip, PixelPoint)> {
        points
            .iter()
            .map(|&(f, (x, y))| (f, PixelPoint::new(x, y)))
            .collect()
    }

    #[test]
    fn test_triggers_inside_threshold() {
        let checker = ProximityChecker::new(50.0);
        let report = checker.check(
            &tips(&[(FingerTip::Index, (130.0, 100.0))]),
            PixelPoint::new(100.0, 100.0),
            false,
        );

        assert!(report.triggered);
        let nearest = report.nearest.unwrap();
        assert_eq!(nearest.distance, 30.0);
        assert_eq!(nearest.finger, FingerTip::Index);
    }

    #[test]
    fn test_no_trigger_outside_threshold() {
        let checker = ProximityChecker::new(50.0);
        let report = checker.check(
            &tips(&[(FingerTip::Index, (160.0, 100.0))]),
            PixelPoint::new(100.0, 100.0),
            false,
        );

        assert!(!report.triggered);
        assert_eq!(report.nearest.unwrap().distance, 60.0);
        assert_eq!(report.confidence, 0.0);
    }

    #[test]
    fn test_exact_threshold_does_not_trigger() {
        let checker = ProximityChecker::new(50.0);
        let report = checker.check(
            &tips(&[(FingerTip::Thumb, (150.0, 100.0))]),
            PixelPoint::new(100.0, 100.0),
            false,
        );

        assert_eq!(report.nearest.unwrap().distance, 50.0);
        assert!(!report.triggered);
    }

    #[test]
    fn test_any_finger_triggers() {
        let checker = ProximityChecker::new(50.0);
        let report = checker.check(
            &tips(&[
                (FingerTip::Thumb, (300.0, 300.0)),
                (FingerTip::Pinky, (110.0, 100.0)),
            ]),
            PixelPoint::new(100.0, 100.0),
            false,
        );

        assert!(report.triggered);
        assert_eq!(report.nearest.unwrap().finger, FingerTip::Pinky);
        assert_eq!(report.distances.len(), 2);
    }

    #[test]
    fn test_confidence_scales_with_distance() {
        let checker = ProximityChecker::new(50.0);

        let at_contact = checker.check(
            &tips(&[(FingerTip::Index, (100.0, 100.0))]),
            PixelPoint::new(100.0, 100.0),
            false,
        );
        assert!((at_contact.confidence - 1.0).abs() < 1e-6);

        let halfway = checker.check(
            &tips(&[(FingerTip::Index, (125.0, 100.0))]),
            PixelPoint::new(100.0, 100.0),
            false,
        );
        assert!((halfway.confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_empty_fingertips() {
        let checker = ProximityChecker::new(50.0);
        let report = checker.check(&[], PixelPoint::new(100.0, 100.0), false);
        assert!(!report.triggered);
        assert!(report.nearest.is_none());
        assert_eq!(report.confidence, 0.0);
    }

    #[test]
    fn test_mouth_reference_skip_policy() {
        let mut mouth = MouthReference::new(MouthFallback::Skip);
        assert!(mouth.active().is_none());

        mouth.observe(Some(PixelPoint::new(100.0, 100.0)));
        assert_eq!(mouth.active(), Some((PixelPoint::new(100.0, 100.0), false)));

        // Face vanished: no point to check against
        mouth.observe(None);
        assert!(mouth.active().is_none());
    }

    #[test]
    fn test_mouth_reference_carry_over_policy() {
        let mut mouth = MouthReference::new(MouthFallback::CarryOver);
        assert!(mouth.active().is_none());

        mouth.observe(Some(PixelPoint::new(100.0, 100.0)));
        assert_eq!(mouth.active(), Some((PixelPoint::new(100.0, 100.0), false)));

        mouth.observe(None);
        assert_eq!(mouth.active(), Some((PixelPoint::new(100.0, 100.0), true)));

        mouth.observe(Some(PixelPoint::new(120.0, 110.0)));
        assert_eq!(mouth.active(), Some((PixelPoint::new(120.0, 110.0), false)));
    }
}
