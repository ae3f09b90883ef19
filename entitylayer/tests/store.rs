//! Integration tests for the entity store over the in-memory backend.
//!
//! The in-memory backend mirrors the observable contract of the MongoDB one
//! (key uniqueness on insert, case-insensitive delete), so the behavior of
//! the store front-end is exercised end to end without a running server.

use entitylayer::{memory::InMemoryStore, prelude::*};

fn room(num: &str, bed: &str) -> Record {
    let mut record = Record::new();
    record.insert("RoomNum".to_string(), Value::from(num));
    record.insert("BedSize".to_string(), Value::from(bed));
    record
}

fn store() -> EntityStore<InMemoryStore> {
    EntityStore::new(InMemoryStore::new())
}

#[tokio::test]
async fn create_then_read_round_trips_the_key() {
    let store = store();

    let created = store.create("rooms", "306", room("306", "Twin")).await.unwrap();
    assert_eq!(created.get("key"), Some(&Value::from("306")));
    assert!(created.contains_key(INTERNAL_ID_FIELD));

    let found = store.read("rooms", "306").await.unwrap();
    assert_eq!(found.get("key"), Some(&Value::from("306")));
    assert_eq!(found.get("RoomNum"), Some(&Value::from("306")));
    assert_eq!(found.get("BedSize"), Some(&Value::from("Twin")));
}

#[tokio::test]
async fn create_keeps_a_caller_supplied_key() {
    let store = store();

    let mut record = room("306", "Twin");
    record.insert("key".to_string(), Value::from("custom"));
    store.create("rooms", "306", record).await.unwrap();

    // The key value passed separately is only injected when absent.
    assert!(store.read("rooms", "306").await.is_err());
    let found = store.read("rooms", "custom").await.unwrap();
    assert_eq!(found.get("RoomNum"), Some(&Value::from("306")));
}

#[tokio::test]
async fn read_miss_reports_entity_and_key() {
    let store = store();
    let err = store.read("rooms", "999").await.unwrap_err();
    assert!(matches!(err, EntityStoreError::NotFound { .. }));
    assert_eq!(err.to_string(), "not found: entity=rooms key=999");
}

#[tokio::test]
async fn read_all_returns_every_record() {
    let store = store();
    for num in ["301", "302", "303"] {
        store.create("rooms", num, room(num, "Twin")).await.unwrap();
    }

    let all = store.read_all("rooms").await.unwrap();
    assert_eq!(all.len(), 3);
    for record in &all {
        assert!(record.get("key").is_some());
        assert!(record.get(INTERNAL_ID_FIELD).is_some());
    }

    // Empty collection yields an empty sequence, never an error.
    assert!(store.read_all("lobbies").await.unwrap().is_empty());
}

#[tokio::test]
async fn find_filters_on_field_equality() {
    let store = store();
    store.create("rooms", "306", room("306", "Twin")).await.unwrap();
    store.create("rooms", "307", room("307", "Queen")).await.unwrap();

    let twins = store.find("rooms", "BedSize", "Twin").await.unwrap();
    assert_eq!(twins.len(), 1);
    assert_eq!(twins[0].get("RoomNum"), Some(&Value::from("306")));

    assert!(store.find("rooms", "BedSize", "King").await.unwrap().is_empty());
}

#[tokio::test]
async fn find_with_empty_field_scans_the_whole_collection() {
    let store = store();
    store.create("rooms", "306", room("306", "Twin")).await.unwrap();
    store.create("rooms", "307", room("307", "Queen")).await.unwrap();

    // The field name alone decides between filter and scan; a leftover
    // value does not narrow the result.
    let all = store.find("rooms", "", "306").await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn update_merges_rather_than_replaces() {
    let store = store();
    store.create("rooms", "306", room("306", "Twin")).await.unwrap();

    let mut patch = Record::new();
    patch.insert("BedSize".to_string(), Value::from("Queen"));
    store.update("rooms", "306", patch).await.unwrap();

    let found = store.read("rooms", "306").await.unwrap();
    assert_eq!(found.get("BedSize"), Some(&Value::from("Queen")));
    assert_eq!(found.get("RoomNum"), Some(&Value::from("306")));
}

#[tokio::test]
async fn update_without_id_uses_the_record_key() {
    let store = store();
    store.create("rooms", "306", room("306", "Twin")).await.unwrap();

    let mut patch = Record::new();
    patch.insert("key".to_string(), Value::from("306"));
    patch.insert("BedSize".to_string(), Value::from("King"));
    store.update("rooms", "", patch).await.unwrap();

    let found = store.read("rooms", "306").await.unwrap();
    assert_eq!(found.get("BedSize"), Some(&Value::from("King")));
}

#[tokio::test]
async fn update_without_any_key_fails() {
    let store = store();
    store.create("rooms", "306", room("306", "Twin")).await.unwrap();

    let mut patch = Record::new();
    patch.insert("BedSize".to_string(), Value::from("King"));
    let err = store.update("rooms", "", patch).await.unwrap_err();
    assert!(matches!(err, EntityStoreError::MissingKey));
}

#[tokio::test]
async fn update_matching_nothing_is_no_match() {
    let store = store();

    let mut patch = Record::new();
    patch.insert("BedSize".to_string(), Value::from("King"));
    let err = store.update("rooms", "999", patch).await.unwrap_err();
    assert!(matches!(err, EntityStoreError::NoMatch { .. }));
    assert_eq!(err.to_string(), "no match found for entity=rooms id=999");
}

#[tokio::test]
async fn delete_removes_exactly_one_record() {
    let store = store();
    store.create("rooms", "306", room("306", "Twin")).await.unwrap();

    store.delete("rooms", "306").await.unwrap();
    let err = store.read("rooms", "306").await.unwrap_err();
    assert!(matches!(err, EntityStoreError::NotFound { .. }));
}

#[tokio::test]
async fn delete_of_missing_key_fails() {
    let store = store();
    let err = store.delete("rooms", "999").await.unwrap_err();
    assert!(matches!(err, EntityStoreError::DeleteFailed { .. }));
    assert_eq!(err.to_string(), "failed to delete entity=rooms id=999");
}

#[tokio::test]
async fn backend_errors_are_rewritten_by_the_error_map() {
    let store = store().with_error_mapping("duplicate key", "room already exists");
    store.create("rooms", "306", room("306", "Twin")).await.unwrap();

    let err = store.create("rooms", "306", room("306", "Queen")).await.unwrap_err();
    assert_eq!(err.to_string(), "room already exists");
}

#[tokio::test]
async fn unmapped_backend_errors_keep_the_driver_wording() {
    let store = store();
    store.create("rooms", "306", room("306", "Twin")).await.unwrap();

    let err = store.create("rooms", "306", room("306", "Queen")).await.unwrap_err();
    assert!(err.to_string().contains("duplicate key"));
}

#[tokio::test]
async fn key_field_name_is_configurable() {
    let store = store().with_key_field("RoomNum");

    store.create("rooms", "306", room("306", "Twin")).await.unwrap();
    let found = store.read("rooms", "306").await.unwrap();
    assert_eq!(found.get("RoomNum"), Some(&Value::from("306")));
    assert!(!found.contains_key("key"));
}

#[tokio::test]
async fn connect_builds_the_backend_through_its_builder() {
    let store: EntityStore<InMemoryStore> =
        EntityStore::connect(InMemoryStore::builder()).await.unwrap();
    store.create("rooms", "306", room("306", "Twin")).await.unwrap();
    store.shutdown().await.unwrap();
}

#[tokio::test]
async fn hotel_rooms_scenario() {
    // Configuration with one address, user `u`, password `p`, database `d`
    // validates eagerly and produces the expected URI.
    let config = ConnectConfig::builder()
        .address("127.0.0.1:27017")
        .user("u")
        .password("p")
        .database("d")
        .build()
        .unwrap();
    assert_eq!(config.connection_uri("mongodb"), "mongodb://u:p@127.0.0.1:27017");

    let store = store();
    store.create("rooms", "306", room("306", "Twin")).await.unwrap();

    let found = store.read("rooms", "306").await.unwrap();
    assert_eq!(found.get("key"), Some(&Value::from("306")));
    assert_eq!(found.get("RoomNum"), Some(&Value::from("306")));
    assert_eq!(found.get("BedSize"), Some(&Value::from("Twin")));
}
