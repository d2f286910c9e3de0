//! Benchmark utilities.

use rand::Rng;
use rediso_codec::{Record, Value};
use rediso_core::{Config, Rediso};
use rediso_storage::InMemoryStore;

/// Generate a random record with `name`, `age`, `team` and a text payload of
/// `payload` bytes.
pub fn random_record(payload: usize) -> Record {
    let mut rng = rand::thread_rng();
    let name: String = (0..8).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();
    let body: String = (0..payload).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();
    [
        ("name", Value::from(name)),
        ("age", Value::from(rng.gen_range(18..90i64))),
        ("team", Value::from(rng.gen_range(0..8i64))),
        ("body", Value::from(body)),
    ]
    .into_iter()
    .collect()
}

/// Generate `count` random records.
pub fn random_records(count: usize, payload: usize) -> Vec<Record> {
    (0..count).map(|_| random_record(payload)).collect()
}

/// Open an in-memory store holding `count` random records in `collection`,
/// indexed by `team`.
pub fn populated(collection: &str, count: usize) -> Rediso<InMemoryStore> {
    let mut db = Rediso::open(InMemoryStore::new(), Config::default())
        .expect("in-memory store opens");
    for record in random_records(count, 64) {
        db.insert(collection, record, &["team"])
            .expect("insert into in-memory store");
    }
    db
}
