//! Property tests over generated records.

use proptest::prelude::*;
use rediso_core::{Operator, Record, RecordId, SearchOptions, Value, ID_FIELD};
use rediso_testkit::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ids_strictly_increase(
        collection in collection_name_strategy(),
        records in prop::collection::vec(record_strategy(), 1..12),
    ) {
        let mut store = TestStore::new();
        let mut last = RecordId::default();
        for record in records {
            let id = store.insert(&collection, record, &[]).unwrap();
            prop_assert!(id > last);
            last = id;
        }
        prop_assert_eq!(store.last_increment(&collection).unwrap(), last.next());
    }

    #[test]
    fn insert_then_get_adds_only_the_id(record in record_strategy()) {
        let mut store = TestStore::new();
        let id = store.insert("t", record.clone(), &[]).unwrap();

        let mut expected = record;
        expected.insert(ID_FIELD, id.as_u64() as i64);
        prop_assert_eq!(store.get("t", id).unwrap(), Some(expected));
    }

    #[test]
    fn indexed_fields_are_reachable(record in record_strategy()) {
        let mut store = TestStore::new();
        let fields: Vec<String> = record.keys().map(str::to_string).collect();
        let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        let id = store.insert("t", record.clone(), &field_refs).unwrap();

        for (field, value) in record.iter() {
            let found = store.lookup("t", field, value).unwrap();
            prop_assert!(found.iter().any(|r| r.id() == Some(id.as_u64())), "{field}");
        }
    }

    #[test]
    fn update_moves_indexed_value(
        field in field_name_strategy(),
        before in non_null_value_strategy(),
        after in non_null_value_strategy(),
    ) {
        prop_assume!(before.render() != after.render());
        let mut store = TestStore::new();
        let id = store.insert("t", record([(field.as_str(), before.clone())]), &[field.as_str()]).unwrap();

        store.update("t", id, &record([(field.as_str(), after.clone())])).unwrap();

        prop_assert!(store.lookup("t", &field, &before).unwrap().is_empty());
        let found = store.lookup("t", &field, &after).unwrap();
        prop_assert_eq!(found.len(), 1);
        prop_assert_eq!(found[0].get(&field).map(Value::render), Some(after.render()));
    }

    #[test]
    fn update_ignores_unknown_fields(record in record_strategy(), extra in field_name_strategy()) {
        prop_assume!(!record.contains(&extra));
        let mut store = TestStore::new();
        let id = store.insert("t", record, &[]).unwrap();
        let before = store.get("t", id).unwrap();

        let changed = store.update("t", id, &Record::from_iter([(extra.as_str(), 1)])).unwrap();
        prop_assert!(!changed);
        prop_assert_eq!(store.get("t", id).unwrap(), before);
    }

    #[test]
    fn delete_leaves_no_trace(records in prop::collection::vec(record_strategy(), 1..6), victim in 0usize..6) {
        let mut store = TestStore::new();
        let count = records.len();
        for record in records {
            let fields: Vec<String> = record.keys().map(str::to_string).collect();
            let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            store.insert("t", record, &refs).unwrap();
        }
        let id = RecordId::new((victim % count) as u64 + 1);
        prop_assert!(store.delete("t", id).unwrap());

        for table in store.keys_matching("rediso:t:primary:*") {
            prop_assert_eq!(store.raw(&table, id), None);
        }
        prop_assert_eq!(store.raw("rediso:t:list", id), None);
    }

    #[test]
    fn id_filters_select_exactly_the_matching_ids(
        count in 1usize..15,
        op in operator_strategy(),
        pivot in 0i64..16,
    ) {
        let mut store = TestStore::new();
        for _ in 0..count {
            store.insert("t", sample_record(), &[]).unwrap();
        }
        let options = SearchOptions::new().filter(ID_FIELD, op, pivot);
        let found: Vec<u64> = store
            .search_all("t", &options)
            .unwrap()
            .records
            .iter()
            .filter_map(Record::id)
            .collect();

        let expected: Vec<u64> = (1..=count as u64)
            .filter(|&id| {
                let id = id as i64;
                match op {
                    Operator::Gt => id > pivot,
                    Operator::Lt => id < pivot,
                    Operator::Eq => id == pivot,
                    Operator::Le => id <= pivot,
                    Operator::Ge => id >= pivot,
                    Operator::Ne => id != pivot,
                }
            })
            .collect();
        prop_assert_eq!(found, expected);
    }
}
