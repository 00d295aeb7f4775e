#[path = "common/mod.rs"]
mod common;

use common::*;
use tetl::{dedupe, MemStore, Store};

fn ts(min: u32) -> String {
    format!("2019-03-01 10:{:02}:00", min)
}

/// Two records with id 42 and one with id 7: exactly one 42 survives,
/// one duplicate group is found, one record is removed.
#[test]
fn pair_of_duplicates_collapses_to_one() {
    let store = MemStore::new();
    store
        .insert_many(vec![
            rec("42", "alice", &ts(0), "first copy", "0", "0"),
            rec("42", "alice", &ts(1), "second copy", "0", "0"),
            rec("7", "bob", &ts(2), "unique", "0", "0"),
        ])
        .unwrap();

    let report = dedupe(&store).unwrap();
    assert_eq!(report.duplicate_groups, 1);
    assert_eq!(report.removed, 1);

    let survivors = store.snapshot().unwrap();
    assert_eq!(survivors.len(), 2);
    assert_eq!(survivors.iter().filter(|r| r.id == "42").count(), 1);
}

/// Groups with three or more occurrences also collapse to one survivor;
/// groups-found and records-removed diverge here.
#[test]
fn higher_multiplicity_groups_fully_collapse() {
    let store = MemStore::new();
    store
        .insert_many(vec![
            rec("9", "alice", &ts(0), "one", "0", "0"),
            rec("9", "alice", &ts(1), "two", "0", "0"),
            rec("9", "alice", &ts(2), "three", "0", "0"),
            rec("1", "bob", &ts(3), "unique", "0", "0"),
        ])
        .unwrap();

    let report = dedupe(&store).unwrap();
    assert_eq!(report.duplicate_groups, 1);
    assert_eq!(report.removed, 2);
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn dedupe_is_idempotent() {
    let store = MemStore::new();
    store
        .insert_many(vec![
            rec("42", "alice", &ts(0), "a", "0", "0"),
            rec("42", "alice", &ts(1), "b", "0", "0"),
            rec("7", "bob", &ts(2), "c", "0", "0"),
        ])
        .unwrap();

    dedupe(&store).unwrap();
    let before = store.snapshot().unwrap();

    let second = dedupe(&store).unwrap();
    assert_eq!(second.duplicate_groups, 0);
    assert_eq!(second.removed, 0);
    assert_eq!(store.snapshot().unwrap(), before);
}

/// After deduplication no two records share an id.
#[test]
fn surviving_ids_are_unique() {
    let store = MemStore::new();
    store
        .insert_many(vec![
            rec("a", "u1", &ts(0), "x", "0", "0"),
            rec("b", "u1", &ts(1), "x", "0", "0"),
            rec("a", "u2", &ts(2), "x", "0", "0"),
            rec("b", "u2", &ts(3), "x", "0", "0"),
            rec("c", "u3", &ts(4), "x", "0", "0"),
        ])
        .unwrap();

    dedupe(&store).unwrap();

    let mut ids: Vec<String> = store.snapshot().unwrap().into_iter().map(|r| r.id).collect();
    ids.sort();
    let n = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), n);
    assert_eq!(n, 3);
}
