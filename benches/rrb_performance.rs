//! Performance benchmarks for the RRB vector.
//!
//! This module benchmarks:
//! - Appending one element at a time, persistently and in a transient session
//! - Random reads
//! - Slicing and concatenation
//! - Sequential traversal through cursors and chunked reads
//!
//! Run with: cargo bench

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rrb_buffer::{RrbVector, TransientVector};

fn build(size: usize) -> RrbVector<u64> {
    (0..size as u64).collect()
}

/// Benchmark appends, persistent versus transient
fn bench_appends(c: &mut Criterion) {
    let mut group = c.benchmark_group("appends");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("persistent", size), size, |b, &size| {
            b.iter(|| {
                let mut vector = RrbVector::new();
                for i in 0..size as u64 {
                    vector = vector.push_back(i);
                }
                black_box(vector.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("transient", size), size, |b, &size| {
            b.iter(|| {
                let mut session = TransientVector::new();
                for i in 0..size as u64 {
                    session.push_back(i);
                }
                black_box(session.persistent().len())
            });
        });
        group.bench_with_input(BenchmarkId::new("append_all", size), size, |b, &size| {
            let base = build(1_000);
            b.iter(|| black_box(base.append_all(0..size as u64).len()));
        });
    }
    group.finish();
}

/// Benchmark indexed reads spread over the whole vector
fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("reads");

    for size in [1_000, 100_000, 1_000_000].iter() {
        let vector = build(*size);
        // A relaxed tree of the same size, to compare against the radix-only path.
        let relaxed = vector.take(size / 3).unwrap().concat(&vector.drop(size / 3).unwrap());
        let stride = 7919;

        group.throughput(Throughput::Elements(1_000));
        group.bench_with_input(BenchmarkId::new("get", size), size, |b, &size| {
            b.iter(|| {
                let mut index = 0;
                let mut sum = 0;
                for _ in 0..1_000 {
                    index = (index + stride) % size;
                    sum += vector.get(index).copied().unwrap_or(0);
                }
                black_box(sum)
            });
        });
        group.bench_with_input(BenchmarkId::new("get_relaxed", size), size, |b, &size| {
            b.iter(|| {
                let mut index = 0;
                let mut sum = 0;
                for _ in 0..1_000 {
                    index = (index + stride) % size;
                    sum += relaxed.get(index).copied().unwrap_or(0);
                }
                black_box(sum)
            });
        });
    }
    group.finish();
}

/// Benchmark take, drop and split at varying positions
fn bench_slicing(c: &mut Criterion) {
    let mut group = c.benchmark_group("slicing");
    let vector = build(100_000);

    for index in [1, 31_337, 50_000, 99_999].iter() {
        group.bench_with_input(BenchmarkId::new("take", index), index, |b, &index| {
            b.iter(|| black_box(vector.take(index).unwrap().len()));
        });
        group.bench_with_input(BenchmarkId::new("drop", index), index, |b, &index| {
            b.iter(|| black_box(vector.drop(index).unwrap().len()));
        });
    }

    group.bench_function("transient_take_drop", |b| {
        b.iter_batched(
            || vector.transient(),
            |mut session| {
                session.drop(1_000).unwrap();
                session.take(50_000).unwrap();
                black_box(session.persistent().len())
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

/// Benchmark concatenation of trees of various shapes
fn bench_concat(c: &mut Criterion) {
    let mut group = c.benchmark_group("concat");

    for size in [100, 10_000, 1_000_000].iter() {
        let left = build(*size);
        let right = build(*size).drop(size / 7).unwrap();

        group.bench_with_input(BenchmarkId::new("balanced", size), size, |b, _| {
            b.iter(|| black_box(left.concat(&right).len()));
        });
        group.bench_with_input(BenchmarkId::new("small_left", size), size, |b, _| {
            let small = build(5);
            b.iter(|| black_box(small.concat(&right).len()));
        });
    }

    // Splice-style edit: split, insert a short run, rejoin.
    let text = build(200_000);
    let insert = build(40);
    group.bench_function("splice", |b| {
        b.iter(|| {
            let (front, back) = text.split_at(123_457).unwrap();
            black_box(front.concat(&insert).concat(&back).len())
        });
    });
    group.finish();
}

/// Benchmark sequential traversal
fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");
    let size = 100_000;
    let vector = build(size);
    group.throughput(Throughput::Elements(size as u64));

    group.bench_function("iter", |b| {
        b.iter(|| black_box(vector.iter().sum::<u64>()));
    });
    group.bench_function("cursor", |b| {
        b.iter(|| black_box(vector.cursor(0).unwrap().sum::<u64>()));
    });
    group.bench_function("read_from", |b| {
        b.iter(|| {
            let mut position = 0;
            let mut sum = 0;
            loop {
                let (chunk, has_more) = vector.read_from(position).unwrap();
                sum += chunk.iter().sum::<u64>();
                position += chunk.len();
                if !has_more {
                    break;
                }
            }
            black_box(sum)
        });
    });
    group.bench_function("read_into", |b| {
        let mut buf = vec![0u64; 4096];
        b.iter(|| {
            let mut position = 0;
            loop {
                let copied = vector.read_into(position, &mut buf).unwrap();
                position += copied;
                if copied < buf.len() {
                    break;
                }
            }
            black_box(position)
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_appends,
    bench_reads,
    bench_slicing,
    bench_concat,
    bench_traversal
);

criterion_main!(benches);
