use planner_core::db::open_db_in_memory;
use planner_core::{KeyValueStore, RepoError, SqliteKeyValueStore};
use rusqlite::Connection;
use std::collections::BTreeMap;

#[test]
fn get_set_overwrite_and_remove() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();

    assert_eq!(store.get("sp_users").unwrap(), None);

    store.set("sp_users", "[]").unwrap();
    store.set("sp_users", "[1]").unwrap();
    assert_eq!(store.get("sp_users").unwrap().as_deref(), Some("[1]"));

    store.remove("sp_users").unwrap();
    assert_eq!(store.get("sp_users").unwrap(), None);
    store.remove("sp_users").unwrap();
}

#[test]
fn json_documents_round_trip_and_corrupt_values_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();

    let mut doc = BTreeMap::new();
    doc.insert("ploy@school.th".to_string(), vec!["ฟังเพลง".to_string()]);
    store.save_json("doc", &doc).unwrap();
    let loaded: BTreeMap<String, Vec<String>> = store.load_json("doc").unwrap().unwrap();
    assert_eq!(loaded, doc);

    store.set("doc", "{not json").unwrap();
    let err = store
        .load_json::<BTreeMap<String, Vec<String>>>("doc")
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("doc")));
}

#[test]
fn atomically_rolls_back_when_the_closure_fails() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    store.set("counter", "1").unwrap();

    let result: Result<(), RepoError> = store.atomically(|| {
        store.set("counter", "2")?;
        Err(RepoError::InvalidData("boom".to_string()))
    });
    assert!(result.is_err());
    assert_eq!(store.get("counter").unwrap().as_deref(), Some("1"));

    store
        .atomically(|| {
            store.set("counter", "3")?;
            store.atomically(|| store.set("nested", "ok"))
        })
        .unwrap();
    assert_eq!(store.get("counter").unwrap().as_deref(), Some("3"));
    assert_eq!(store.get("nested").unwrap().as_deref(), Some("ok"));
    assert!(conn.is_autocommit());
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteKeyValueStore::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
