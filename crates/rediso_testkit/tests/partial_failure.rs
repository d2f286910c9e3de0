//! Multi-key writes interrupted by a failing store command.
//!
//! Writes are not transactional: whatever ran before the failure stays.

use rediso_core::{
    Config, ConnectionStage, CoreError, ErrorKind, Rediso, RecordId, SearchOptions,
};
use rediso_storage::{HashStore, InMemoryStore};
use rediso_testkit::prelude::*;

const LIST: &str = "rediso:mytable:list";
const KEY2: &str = "rediso:mytable:primary:key2:value2";

#[test]
fn failing_index_write_leaves_list_entry() {
    let mut db = faulty_db();
    // counter and list writes pass, the first index write fails
    db.store_mut().fail_on("HSET", 2);

    let err = db
        .insert("mytable", sample_record(), &["key2", "key3"])
        .unwrap_err();
    assert!(matches!(err, CoreError::BackingStore { operation: "insert", .. }));

    let stored = db.get("mytable", RecordId::FIRST).unwrap();
    assert!(stored.is_some());
    assert!(!db.store().exists(KEY2).unwrap());
    assert_eq!(db.stats().errors(), 1);
    assert_eq!(db.stats().inserts(), 0);

    // the counter moved on, so the next insert does not reuse the id
    let next = db.insert("mytable", sample_record(), &["key2"]).unwrap();
    assert_eq!(next, RecordId::new(2));
}

#[test]
fn failing_counter_write_writes_nothing_else() {
    let mut db = faulty_db();
    db.store_mut().fail_on("HSET", 0);

    assert!(db.insert("mytable", sample_record(), &["key2"]).is_err());
    assert!(!db.store().exists(LIST).unwrap());
    assert_eq!(db.last_increment("mytable").unwrap(), RecordId::FIRST);
}

#[test]
fn failing_rename_leaves_old_list_entry() {
    let mut db = faulty_db();
    db.insert("mytable", sample_record(), &["key2"]).unwrap();
    let before = db.store().hget(LIST, "1").unwrap();

    db.store_mut().fail_on("RENAME", 0);
    let err = db
        .update("mytable", RecordId::FIRST, &record([("key2", "newval")]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackingStore);

    assert_eq!(db.store().hget(LIST, "1").unwrap(), before);
    assert!(db.store().exists(KEY2).unwrap());

    // once healed the same update goes through
    db.store_mut().heal();
    assert!(db
        .update("mytable", RecordId::FIRST, &record([("key2", "newval")]))
        .unwrap());
    assert!(!db.store().exists(KEY2).unwrap());
}

#[test]
fn failing_scan_during_delete_leaves_index_entries() {
    let mut db = faulty_db();
    db.insert("mytable", sample_record(), &["key2"]).unwrap();

    db.store_mut().fail_on("KEYS", 0);
    let err = db.delete("mytable", RecordId::FIRST).unwrap_err();
    assert!(matches!(err, CoreError::BackingStore { operation: "delete", .. }));

    assert!(!db.store().exists(LIST).unwrap());
    assert!(db.store().hget(KEY2, "1").unwrap().is_some());
}

#[test]
fn failing_fetch_does_not_poison_the_cache() {
    let mut db = faulty_db();
    db.insert("mytable", sample_record(), &[]).unwrap();

    db.store_mut().fail_on("HGETALL", 0);
    assert!(db.search_all("mytable", &SearchOptions::new()).is_err());
    assert_eq!(db.search_all("mytable", &SearchOptions::new()).unwrap().count, 1);
}

#[test]
fn failing_ping_fails_open() {
    let mut store = FaultyStore::new(InMemoryStore::new());
    store.fail_always("PING");
    let err = Rediso::open(store, Config::default()).unwrap_err();
    assert!(matches!(err, CoreError::Connection { stage: ConnectionStage::Ping, .. }));
}

#[test]
fn every_insert_step_is_one_command() {
    let mut db = faulty_db();
    db.insert("mytable", sample_record(), &["key2", "key3"]).unwrap();
    assert_eq!(db.store().calls("HGET"), 1);
    assert_eq!(db.store().calls("HSET"), 4);
}
