// Sled backend: persistence and migration on load
#![cfg(feature = "sled")]

mod common;

use common::*;
use netabase_mappings::databases::SledStore;
use netabase_mappings::prelude::*;
use netabase_mappings::{StoreConfig, VERSION_KEY};

fn store_in(dir: &tempfile::TempDir) -> SledStore {
    SledStore::open(&StoreConfig::new(dir.path().join("db"))).unwrap()
}

#[test]
fn put_get_remove() {
    init_logging();
    let store = SledStore::temp().unwrap();
    assert!(store.is_empty());

    store.put("a1", &mut sample_a()).unwrap();
    assert!(store.contains("a1").unwrap());
    assert_eq!(store.len(), 1);

    let a: Option<A> = store.get("a1").unwrap();
    assert_eq!(a, Some(sample_a()));

    assert!(store.remove("a1").unwrap());
    assert!(!store.remove("a1").unwrap());
    assert_eq!(store.get::<A>("a1").unwrap(), None);
}

#[test]
fn ids_lists_every_record() {
    let store = SledStore::temp().unwrap();
    for id in ["b", "a", "c"] {
        store.put(id, &mut sample_a()).unwrap();
    }
    assert_eq!(store.ids().unwrap(), vec!["a", "b", "c"]);

    store.clear().unwrap();
    assert!(store.ids().unwrap().is_empty());
}

#[test]
fn records_persist_across_reopen() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    {
        let store = store_in(&dir);
        store.put("a1", &mut sample_a()).unwrap();
        store.flush().unwrap();
    }

    let store = store_in(&dir);
    assert_eq!(store.get::<A>("a1").unwrap(), Some(sample_a()));
}

#[test]
fn old_records_migrate_on_load() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    {
        // written by a build that only knew version 0
        let store = store_in(&dir);
        store.put("a1", &mut sample_a()).unwrap();
        store.flush().unwrap();
    }

    let store = store_in(&dir);
    let c: C = store.get("a1").unwrap().unwrap();
    assert_eq!(c.y, 7);
    assert_eq!(c.z, vec!["aoeu".to_string(), ";qjkx".to_string()]);

    // the stored bytes stay at version 0 until rewritten
    let raw = store.record("a1").unwrap().unwrap();
    assert!(!raw.contains(VERSION_KEY));

    let mut c = c;
    store.put("a1", &mut c).unwrap();
    let raw = store.record("a1").unwrap().unwrap();
    assert_eq!(raw.get(VERSION_KEY), Some(&StoredValue::U32(2)));
}

#[test]
fn newer_records_are_rejected() {
    let store = SledStore::temp().unwrap();
    store.put("c1", &mut C::default()).unwrap();

    let err = store.get::<B>("c1").unwrap_err();
    assert!(matches!(err, MappingError::NewerVersion { .. }));
}

#[test]
fn load_into_reports_presence() {
    let store = SledStore::temp().unwrap();
    let mut b = B::default();
    assert!(!store.load_into("missing", &mut b).unwrap());

    store.put("a1", &mut sample_a()).unwrap();
    assert!(store.load_into("a1", &mut b).unwrap());
    assert_eq!(b.y, Some(7.2));
}

#[test]
fn custom_mappings_apply_to_the_store() {
    let mappings = Mappings::new(MappingsConfig::builder().always_write_version(true).build());
    let store = SledStore::temp().unwrap().with_mappings(mappings);

    store.put("a1", &mut sample_a()).unwrap();
    let raw = store.record("a1").unwrap().unwrap();
    assert_eq!(raw.get(VERSION_KEY), Some(&StoredValue::U32(0)));
}

#[test]
fn custom_tree_name() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::builder()
        .path(dir.path().join("db"))
        .tree_name("posts")
        .use_fsync(true)
        .build();
    let store = SledStore::open(&config).unwrap();
    store.put("p", &mut sample_a()).unwrap();

    let names: Vec<_> = store.db().tree_names();
    assert!(names.iter().any(|n| &n[..] == b"posts"));
}
