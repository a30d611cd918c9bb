//! Integration tests for detection event tracking

use nailguard::events::{DebounceGate, DetectionEvent, EventLog, Handedness};
use nailguard::geometry::FingerTip;
use std::time::Duration;

fn event_at(secs: u64, hand: Handedness, finger: FingerTip) -> DetectionEvent {
    DetectionEvent {
        at: Duration::from_secs(secs),
        hand,
        finger,
        distance: 25.0,
        confidence: 0.5,
    }
}

#[test]
fn test_debounce_feeding_into_log() {
    let mut gate = DebounceGate::new(Duration::from_millis(300));
    let mut log = EventLog::new(100);

    // Simulate a 30fps stream: frames every ~33ms, gesture held from
    // 500ms to 1200ms
    for frame in 0..60u64 {
        let now = Duration::from_millis(frame * 33);
        let raw = (500..=1200).contains(&now.as_millis());

        log.record_frame(raw);
        if gate.update(raw, now) {
            log.push(event_at(now.as_secs(), Handedness::Right, FingerTip::Index));
        }
    }

    // One sustained gesture, one event
    assert_eq!(log.total(), 1);
    assert!(log.hit_rate() > 0.0);
}

#[test]
fn test_two_separate_gestures_two_events() {
    let mut gate = DebounceGate::new(Duration::from_millis(300));
    let mut fired = 0;

    for frame in 0..120u64 {
        let now = Duration::from_millis(frame * 33);
        let ms = now.as_millis();
        let raw = (0..=400).contains(&ms) || (2000..=2500).contains(&ms);
        if gate.update(raw, now) {
            fired += 1;
        }
    }

    assert_eq!(fired, 2);
}

#[test]
fn test_windowed_statistics() {
    let mut log = EventLog::new(10);
    log.push(event_at(30, Handedness::Left, FingerTip::Thumb));
    log.push(event_at(90, Handedness::Right, FingerTip::Index));
    log.push(event_at(95, Handedness::Right, FingerTip::Index));
    log.push(event_at(500, Handedness::Left, FingerTip::Pinky));

    let now = Duration::from_secs(600);

    // Ten-minute window sees everything
    assert_eq!(log.attempts_within(Duration::from_secs(600), now), 4);
    assert_eq!(log.counts_by_hand(Duration::from_secs(600), now), (2, 2));

    // Two-minute window sees only the last event
    assert_eq!(log.attempts_within(Duration::from_secs(120), now), 1);
    assert_eq!(log.counts_by_hand(Duration::from_secs(120), now), (1, 0));
}

#[test]
fn test_minute_buckets_group_by_minute() {
    let mut log = EventLog::new(10);
    log.push(event_at(10, Handedness::Left, FingerTip::Thumb));
    log.push(event_at(40, Handedness::Left, FingerTip::Thumb));
    log.push(event_at(65, Handedness::Right, FingerTip::Index));

    let now = Duration::from_secs(120);
    let buckets = log.minute_buckets(Duration::from_secs(120), now);

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0], (0, 2));
    assert_eq!(buckets[1], (1, 1));
}

#[test]
fn test_events_are_retained_in_order() {
    let mut log = EventLog::new(10);
    log.push(event_at(5, Handedness::Left, FingerTip::Thumb));
    log.push(event_at(10, Handedness::Right, FingerTip::Middle));

    let events = log.events();
    assert_eq!(events.len(), 2);
    assert!(events[0].at < events[1].at);
    assert_eq!(events[1].finger, FingerTip::Middle);
}
