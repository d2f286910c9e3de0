//! Record write and read benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rediso_bench::{populated, random_record};
use rediso_codec::{Record, Value};
use rediso_core::{Config, RecordId, Rediso};
use rediso_storage::InMemoryStore;

/// Benchmark inserts by number of index fields.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    let fields = ["team", "age", "name"];

    for indexes in [0usize, 1, 3] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(indexes), &indexes, |b, &indexes| {
            let mut db = Rediso::open(InMemoryStore::new(), Config::default()).unwrap();
            let record = random_record(256);

            b.iter(|| {
                db.insert("bench", black_box(record.clone()), &fields[..indexes])
                    .unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark updates, which scan every index table of the collection.
fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for size in [100usize, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut db = populated("bench", size);
            let mut team = 0i64;

            b.iter(|| {
                team = (team + 1) % 8;
                let partial: Record = [("team", Value::from(team))].into_iter().collect();
                db.update("bench", RecordId::FIRST, black_box(&partial)).unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark point reads and index lookups.
fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    let db = populated("bench", 1000);

    group.bench_function("get", |b| {
        b.iter(|| db.get("bench", black_box(RecordId::new(500))).unwrap());
    });
    group.bench_function("lookup", |b| {
        b.iter(|| db.lookup("bench", "team", black_box(&Value::from(3))).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_update, bench_read);
criterion_main!(benches);
