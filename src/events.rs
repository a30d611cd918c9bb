//! Detection event tracking and session statistics.
//!
//! Raw per-frame proximity hits are noisy: a hand passing the mouth for two
//! frames is not a nail-biting attempt. A [`DebounceGate`] turns sustained
//! raw detections into discrete events, and an [`EventLog`] keeps them with
//! enough structure to answer the questions the overlay displays: attempts
//! in the last N minutes, the left/right split, the per-minute timeline, and
//! the rolling frame hit rate.

use crate::geometry::FingerTip;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// Which hand an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => write!(f, "left"),
            Handedness::Right => write!(f, "right"),
        }
    }
}

/// One confirmed nail-biting attempt
#[derive(Debug, Clone)]
pub struct DetectionEvent {
    /// Time since session start
    pub at: Duration,
    /// Which hand triggered
    pub hand: Handedness,
    /// The fingertip closest to the mouth when the event fired
    pub finger: FingerTip,
    /// Fingertip-to-mouth distance in pixels
    pub distance: f32,
    /// Detection confidence at fire time
    pub confidence: f32,
}

/// Temporal smoothing gate: a raw detection must persist for the hold
/// duration before it becomes an event, and the gate must clear before it
/// can fire again.
#[derive(Debug)]
pub struct DebounceGate {
    hold: Duration,
    pending_since: Option<Duration>,
    fired: bool,
}

impl DebounceGate {
    #[must_use]
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            pending_since: None,
            fired: false,
        }
    }

    /// Feed one frame's raw detection state; returns true when an event
    /// should fire this frame.
    pub fn update(&mut self, raw_detected: bool, now: Duration) -> bool {
        if !raw_detected {
            self.pending_since = None;
            self.fired = false;
            return false;
        }

        let since = *self.pending_since.get_or_insert(now);
        if !self.fired && now.saturating_sub(since) >= self.hold {
            self.fired = true;
            return true;
        }
        false
    }

    /// Whether a raw detection is currently being held
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some() && !self.fired
    }
}

/// Session event log with windowed statistics
pub struct EventLog {
    events: Vec<DetectionEvent>,
    history: VecDeque<bool>,
    history_cap: usize,
}

impl EventLog {
    #[must_use]
    pub fn new(history_cap: usize) -> Self {
        Self {
            events: Vec::new(),
            history: VecDeque::with_capacity(history_cap),
            history_cap,
        }
    }

    /// Append a confirmed event
    pub fn push(&mut self, event: DetectionEvent) {
        log::info!(
            "nail-biting attempt: {} hand, {} finger, {:.1}px ({:.0}% confidence)",
            event.hand,
            event.finger.name(),
            event.distance,
            event.confidence * 100.0
        );
        self.events.push(event);
    }

    /// Record one frame's raw detection outcome in the rolling history
    pub fn record_frame(&mut self, detected: bool) {
        if self.history_cap == 0 {
            return;
        }
        if self.history.len() >= self.history_cap {
            self.history.pop_front();
        }
        self.history.push_back(detected);
    }

    /// Total events this session
    #[must_use]
    pub fn total(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn events(&self) -> &[DetectionEvent] {
        &self.events
    }

    /// Number of events within `window` of `now`
    #[must_use]
    pub fn attempts_within(&self, window: Duration, now: Duration) -> usize {
        let cutoff = now.saturating_sub(window);
        self.events.iter().filter(|e| e.at >= cutoff).count()
    }

    /// (left, right) event counts within `window` of `now`
    #[must_use]
    pub fn counts_by_hand(&self, window: Duration, now: Duration) -> (usize, usize) {
        let cutoff = now.saturating_sub(window);
        let mut left = 0;
        let mut right = 0;
        for event in self.events.iter().filter(|e| e.at >= cutoff) {
            match event.hand {
                Handedness::Left => left += 1,
                Handedness::Right => right += 1,
            }
        }
        (left, right)
    }

    /// Per-minute event counts within `window` of `now`, keyed by minute
    /// index since session start, ascending.
    #[must_use]
    pub fn minute_buckets(&self, window: Duration, now: Duration) -> Vec<(u64, usize)> {
        let cutoff = now.saturating_sub(window);
        let mut buckets: Vec<(u64, usize)> = Vec::new();

        for event in self.events.iter().filter(|e| e.at >= cutoff) {
            let minute = event.at.as_secs() / 60;
            match buckets.iter_mut().find(|(m, _)| *m == minute) {
                Some((_, count)) => *count += 1,
                None => buckets.push((minute, 1)),
            }
        }

        buckets.sort_by_key(|&(minute, _)| minute);
        buckets
    }

    /// Fraction of recent frames with a raw detection
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        let positives = self.history.iter().filter(|&&d| d).count();
        positives as f64 / self.history.len() as f64
    }

    /// Log a session summary (totals, hand split, hit rate)
    pub fn log_summary(&self, elapsed: Duration) {
        let (left, right) = self.counts_by_hand(elapsed, elapsed);
        log::info!(
            "session summary: {} attempts over {:.0}s (left: {}, right: {}), recent hit rate {:.0}%",
            self.total(),
            elapsed.as_secs_f64(),
            left,
            right,
            self.hit_rate() * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(at_secs: u64, hand: Handedness) -> DetectionEvent {
        DetectionEvent {
            at: Duration::from_secs(at_secs),
            hand,
            finger: FingerTip::Index,
            distance: 20.0,
            confidence: 0.6,
        }
    }

    #[test]
    fn test_debounce_short_blip_does_not_fire() {
        let mut gate = DebounceGate::new(Duration::from_millis(300));

        assert!(!gate.update(true, Duration::from_millis(0)));
        assert!(!gate.update(true, Duration::from_millis(100)));
        assert!(!gate.update(false, Duration::from_millis(200)));
        // Gesture returns: the hold timer restarts
        assert!(!gate.update(true, Duration::from_millis(250)));
        assert!(!gate.update(true, Duration::from_millis(400)));
    }

    #[test]
    fn test_debounce_sustained_detection_fires_once() {
        let mut gate = DebounceGate::new(Duration::from_millis(300));

        assert!(!gate.update(true, Duration::from_millis(0)));
        assert!(!gate.update(true, Duration::from_millis(150)));
        assert!(gate.update(true, Duration::from_millis(300)));
        // Still held: no second event
        assert!(!gate.update(true, Duration::from_millis(450)));
        assert!(!gate.update(true, Duration::from_millis(10_000)));
    }

    #[test]
    fn test_debounce_rearms_after_release() {
        let mut gate = DebounceGate::new(Duration::from_millis(300));

        assert!(!gate.update(true, Duration::from_millis(0)));
        assert!(gate.update(true, Duration::from_millis(300)));
        assert!(!gate.update(false, Duration::from_millis(400)));
        assert!(!gate.update(true, Duration::from_millis(500)));
        assert!(gate.update(true, Duration::from_millis(800)));
    }

    #[test]
    fn test_debounce_zero_hold_fires_immediately() {
        let mut gate = DebounceGate::new(Duration::ZERO);
        assert!(gate.update(true, Duration::from_millis(5)));
        assert!(!gate.update(true, Duration::from_millis(6)));
    }

    #[test]
    fn test_attempts_within_window() {
        let mut log = EventLog::new(10);
        log.events.push(event(10, Handedness::Left));
        log.events.push(event(100, Handedness::Right));
        log.events.push(event(290, Handedness::Right));

        let now = Duration::from_secs(300);
        assert_eq!(log.attempts_within(Duration::from_secs(300), now), 3);
        assert_eq!(log.attempts_within(Duration::from_secs(60), now), 1);
        assert_eq!(log.attempts_within(Duration::from_secs(5), now), 0);
    }

    #[test]
    fn test_counts_by_hand() {
        let mut log = EventLog::new(10);
        log.events.push(event(10, Handedness::Left));
        log.events.push(event(20, Handedness::Right));
        log.events.push(event(30, Handedness::Right));

        let now = Duration::from_secs(60);
        assert_eq!(log.counts_by_hand(Duration::from_secs(60), now), (1, 2));
        assert_eq!(log.counts_by_hand(Duration::from_secs(35), now), (0, 2));
    }

    #[test]
    fn test_minute_buckets() {
        let mut log = EventLog::new(10);
        log.events.push(event(10, Handedness::Left));
        log.events.push(event(50, Handedness::Left));
        log.events.push(event(70, Handedness::Right));
        log.events.push(event(200, Handedness::Right));

        let now = Duration::from_secs(240);
        let buckets = log.minute_buckets(Duration::from_secs(240), now);
        assert_eq!(buckets, vec![(0, 2), (1, 1), (3, 1)]);
    }

    #[test]
    fn test_hit_rate_over_bounded_history() {
        let mut log = EventLog::new(4);
        assert_eq!(log.hit_rate(), 0.0);

        log.record_frame(true);
        log.record_frame(false);
        log.record_frame(true);
        log.record_frame(true);
        assert!((log.hit_rate() - 0.75).abs() < 1e-9);

        // Ring is full: the oldest (true) entry drops out
        log.record_frame(false);
        assert!((log.hit_rate() - 0.5).abs() < 1e-9);
    }
}
