//! Benchmarks for event tracking and windowed statistics

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nailguard::events::{DebounceGate, DetectionEvent, EventLog, Handedness};
use nailguard::geometry::FingerTip;
use std::time::Duration;

fn populated_log(events: usize) -> EventLog {
    let mut log = EventLog::new(300);
    for i in 0..events {
        log.push(DetectionEvent {
            at: Duration::from_millis(i as u64 * 1500),
            hand: if i % 3 == 0 { Handedness::Left } else { Handedness::Right },
            finger: FingerTip::ALL[i % 5],
            distance: rand::random::<f32>() * 50.0,
            confidence: rand::random::<f32>(),
        });
        log.record_frame(i % 4 == 0);
    }
    log
}

fn benchmark_event_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_log");

    let log = populated_log(500);
    let now = Duration::from_secs(800);
    let window = Duration::from_secs(300);

    group.bench_function("attempts_within", |b| {
        b.iter(|| black_box(log.attempts_within(black_box(window), now)));
    });

    group.bench_function("counts_by_hand", |b| {
        b.iter(|| black_box(log.counts_by_hand(black_box(window), now)));
    });

    group.bench_function("minute_buckets", |b| {
        b.iter(|| black_box(log.minute_buckets(black_box(window), now)));
    });

    group.bench_function("hit_rate", |b| {
        b.iter(|| black_box(log.hit_rate()));
    });

    group.finish();
}

fn benchmark_debounce(c: &mut Criterion) {
    c.bench_function("debounce_update", |b| {
        let mut gate = DebounceGate::new(Duration::from_millis(300));
        let mut frame: u64 = 0;
        b.iter(|| {
            frame += 1;
            let now = Duration::from_millis(frame * 33);
            black_box(gate.update(frame % 20 < 10, now))
        });
    });
}

criterion_group!(benches, benchmark_event_log, benchmark_debounce);
criterion_main!(benches);
