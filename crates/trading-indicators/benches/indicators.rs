//! Benchmarks for indicator implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trading_core::types::Bar;
use trading_indicators::{Atr, EventDetector};

fn generate_test_bars(size: usize) -> Vec<Bar> {
    (0..size)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar::new(i as i64 * 60_000, close, close + 1.5, close - 1.5, close, 1000.0)
        })
        .collect()
}

fn benchmark_atr(c: &mut Criterion) {
    let mut group = c.benchmark_group("ATR");

    for size in [15, 1000, 100000].iter() {
        let bars = generate_test_bars(*size);

        group.bench_with_input(BenchmarkId::new("latest", size), &bars, |b, bars| {
            let atr = Atr::new(14);
            b.iter(|| atr.latest(black_box(bars)))
        });

        group.bench_with_input(BenchmarkId::new("rolling", size), &bars, |b, bars| {
            let atr = Atr::new(14);
            b.iter(|| atr.calculate_bars(black_box(bars)))
        });
    }

    group.finish();
}

fn benchmark_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("EventDetector");

    for size in [100, 10000, 100000].iter() {
        let bars = generate_test_bars(*size);

        group.bench_with_input(BenchmarkId::new("detect", size), &bars, |b, bars| {
            let detector = EventDetector::new(0.01);
            b.iter(|| detector.detect(black_box(bars)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_atr, benchmark_events);
criterion_main!(benches);
