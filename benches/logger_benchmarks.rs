//! Criterion benchmarks for dispatch_logger

use chrono::Local;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use dispatch_logger::core::format_record;
use dispatch_logger::prelude::*;
use std::sync::Arc;

/// Accepts everything and keeps nothing
struct NullProvider;

impl Provider for NullProvider {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        black_box(record);
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let record = LogRecord::with_timestamp(LogLevel::Info, "Hello, key is \"abc\"", Local::now());
    group.bench_function("format_record", |b| {
        b.iter(|| black_box(format_record(black_box(&record))));
    });

    let at = Local::now();
    group.bench_function("hourly_key", |b| {
        b.iter(|| black_box(SplitBy::Hourly.key_for(black_box(&at))));
    });

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let dispatcher = Dispatcher::builder()
        .level(LogLevel::Error)
        .provider(NullProvider)
        .start()
        .expect("start dispatcher");

    group.bench_function("filtered_debug", |b| {
        b.iter(|| dispatcher.debug(black_box("Filtered message")));
    });

    group.finish();
    dispatcher.stop().expect("stop dispatcher");
}

fn bench_handoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("handoff");
    group.throughput(Throughput::Elements(1));

    let dispatcher = Dispatcher::builder()
        .provider(NullProvider)
        .start()
        .expect("start dispatcher");

    group.bench_function("info_to_null_provider", |b| {
        b.iter(|| dispatcher.info(black_box("Delivered message")));
    });

    group.bench_function("flush_round_trip", |b| {
        b.iter(|| dispatcher.flush().expect("flush"));
    });

    group.finish();
    dispatcher.stop().expect("stop dispatcher");
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");
    group.throughput(Throughput::Elements(400));

    let dispatcher = Arc::new(
        Dispatcher::builder()
            .provider(NullProvider)
            .start()
            .expect("start dispatcher"),
    );

    group.bench_function("4_threads_x_100", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let dispatcher = Arc::clone(&dispatcher);
                    std::thread::spawn(move || {
                        for i in 0..100 {
                            dispatcher.info(format!("Message {}", i));
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().expect("producer thread");
            }
        });
    });

    group.finish();
    dispatcher.stop().expect("stop dispatcher");
}

criterion_group!(
    benches,
    bench_formatting,
    bench_level_filtering,
    bench_handoff,
    bench_concurrent_logging,
);
criterion_main!(benches);
