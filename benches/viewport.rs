//! Benchmarks for the per-frame hot path: window computation, pool
//! rebinding and address encoding.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xlgrid::layout::{CellMetrics, CellPool, Viewport};
use xlgrid::{column_to_letters, parse_address, to_address};

const METRICS: CellMetrics = CellMetrics::new(100.0, 24.0);

/// Window computation at positions across a 100k x 1k sheet
fn bench_visible_window(c: &mut Criterion) {
    let mut viewport = Viewport::new(1920.0, 1080.0);

    c.bench_function("visible_window", |b| {
        let mut y = 0.0_f32;
        b.iter(|| {
            y = (y + 240.0) % 2_400_000.0;
            viewport.scroll_y = y;
            black_box(viewport.visible_window(&METRICS, 3, 100_000, 1_000))
        })
    });
}

/// One frame of scrolling: recompute the window and rebind the pool
fn bench_scroll_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_frame");

    for (name, width, height) in [("laptop", 1280.0, 720.0), ("4k", 3840.0, 2160.0)] {
        let mut viewport = Viewport::new(width, height);
        let mut pool = CellPool::new(
            viewport.row_span(&METRICS, 3),
            viewport.col_span(&METRICS, 3),
        );
        group.throughput(Throughput::Elements(pool.capacity() as u64));
        group.bench_function(BenchmarkId::new("rebind", name), |b| {
            let mut y = 0.0_f32;
            b.iter(|| {
                // Three rows per frame, a typical wheel step.
                y = (y + 72.0) % 2_000_000.0;
                viewport.scroll_y = y;
                let window = viewport.visible_window(&METRICS, 3, 100_000, 1_000);
                black_box(pool.bind(&window))
            })
        });
    }

    group.finish();
}

/// Encoding and decoding addresses for a full visible window
fn bench_address_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("address_codec");
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("encode", |b| {
        b.iter(|| {
            for col in 0..1_000 {
                black_box(to_address(black_box(99_999), col));
            }
        })
    });

    let addresses: Vec<String> = (0..1_000).map(|col| to_address(99_999, col)).collect();
    group.bench_function("decode", |b| {
        b.iter(|| {
            for address in &addresses {
                black_box(parse_address(address).expect("valid address"));
            }
        })
    });

    group.bench_function("column_letters_wide", |b| {
        b.iter(|| black_box(column_to_letters(black_box(u32::MAX))))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_visible_window,
    bench_scroll_frame,
    bench_address_codec,
);

criterion_main!(benches);
