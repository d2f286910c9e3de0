//! Demo command implementation.
//!
//! Walks through insert, update, search and delete on an in-memory store and
//! prints the keys each step leaves behind.

use super::Format;
use rediso_core::{Config, Operator, Record, RecordId, Rediso, SearchOptions, StatsSnapshot};
use rediso_storage::{HashStore, InMemoryStore};
use serde::Serialize;

const COLLECTION: &str = "mytable";

/// One step of the walkthrough.
#[derive(Debug, Serialize)]
pub struct DemoStep {
    /// What the step did.
    pub action: String,
    /// Keys of the collection after the step, sorted.
    pub keys: Vec<String>,
}

/// Full walkthrough output.
#[derive(Debug, Serialize)]
pub struct DemoReport {
    /// Steps in order.
    pub steps: Vec<DemoStep>,
    /// Records found by the search step.
    pub found: Vec<Record>,
    /// Counters at the end.
    pub stats: StatsSnapshot,
}

/// Runs the demo command.
pub fn run(namespace: &str, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let report = walkthrough(namespace)?;
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => {
            for step in &report.steps {
                println!("{}", step.action);
                for key in &step.keys {
                    println!("  {key}");
                }
            }
            println!();
            println!("Search found {} record(s):", report.found.len());
            for record in &report.found {
                println!("  {}", rediso_codec::to_json(record)?);
            }
            println!();
            println!("Store commands: {}", report.stats.commands);
        }
    }
    Ok(())
}

/// Performs the walkthrough and records every step.
pub fn walkthrough(namespace: &str) -> Result<DemoReport, Box<dyn std::error::Error>> {
    let mut db = Rediso::open(InMemoryStore::new(), Config::new().namespace(namespace))?;
    let mut steps = Vec::new();

    let sample: Record = [("key1", "value1"), ("key2", "value2"), ("key3", "value3")]
        .into_iter()
        .collect();

    for _ in 0..2 {
        let id = db.insert(COLLECTION, sample.clone(), &["key2", "key3"])?;
        steps.push(step(&db, format!("insert -> id {id}"))?);
    }

    let partial: Record = [("key2", "newval")].into_iter().collect();
    let changed = db.update(COLLECTION, RecordId::new(1), &partial)?;
    steps.push(step(&db, format!("update id 1 key2=newval -> changed {changed}"))?);

    let options = SearchOptions::new().filter("key2", Operator::Eq, "newval");
    let found = db.search_all(COLLECTION, &options)?.records;

    let existed = db.delete(COLLECTION, RecordId::new(2))?;
    steps.push(step(&db, format!("delete id 2 -> existed {existed}"))?);

    Ok(DemoReport {
        steps,
        found,
        stats: db.stats().snapshot(),
    })
}

fn step(
    db: &Rediso<InMemoryStore>,
    action: String,
) -> Result<DemoStep, Box<dyn std::error::Error>> {
    let pattern = format!("{}:{COLLECTION}:*", db.keys().namespace());
    let mut keys = db.store().keys(&pattern)?;
    keys.sort();
    tracing::debug!(%action, keys = keys.len(), "demo step");
    Ok(DemoStep { action, keys })
}
