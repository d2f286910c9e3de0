//! Record codec and comparison benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rediso_bench::random_record;
use rediso_codec::{from_json, to_json, Value};

/// Benchmark record encoding by payload size.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for size in [64usize, 1024, 16_384] {
        let record = random_record(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &record, |b, record| {
            b.iter(|| to_json(black_box(record)).unwrap());
        });
    }
    group.finish();
}

/// Benchmark record decoding by payload size.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [64usize, 1024, 16_384] {
        let json = to_json(&random_record(size)).unwrap();
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| from_json(black_box(json)).unwrap());
        });
    }
    group.finish();
}

/// Benchmark loose comparison across value kinds.
fn bench_loose_cmp(c: &mut Criterion) {
    let pairs = [
        ("int_int", Value::from(41), Value::from(42)),
        ("int_numeric_text", Value::from(41), Value::from("42.5")),
        ("text_text", Value::from("alice"), Value::from("bob")),
        ("bool_text", Value::from(true), Value::from("0")),
    ];
    let mut group = c.benchmark_group("loose_cmp");
    for (name, a, b) in &pairs {
        group.bench_function(*name, |bench| {
            bench.iter(|| black_box(a).loose_cmp(black_box(b)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_loose_cmp);
criterion_main!(benches);
