//! In-memory storage implementation for entity stores.
//!
//! This module provides a simple in-memory backend that stores records in
//! HashMaps behind async-safe read-write locks. It mirrors the observable
//! contract of the MongoDB backend closely enough to stand in for it during
//! development and in the test suite: key uniqueness is enforced at insert
//! with a MongoDB-styled duplicate-key message, and deletes match the key
//! case-insensitively the way the fixed collation does.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use mea::rwlock::RwLock;
use uuid::Uuid;

use entitylayer_core::{
    backend::{EntityBackend, EntityBackendBuilder},
    error::{EntityStoreError, EntityStoreResult},
    value::{INTERNAL_ID_FIELD, Record, Value},
};

type CollectionVec = Vec<Record>;
type StoreMap = HashMap<String, CollectionVec>;

/// Thread-safe in-memory entity storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so
/// clones share the same underlying data across async tasks. Lookups scan the
/// collection linearly; there is no indexing.
///
/// # Example
///
/// ```ignore
/// use entitylayer_memory::InMemoryStore;
/// use entitylayer_core::store::EntityStore;
///
/// let store = EntityStore::new(InMemoryStore::new());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection name -> records in insertion order.
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

fn field_equals_str(record: &Record, field: &str, value: &str) -> bool {
    record
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|v| v == value)
}

#[async_trait]
impl EntityBackend for InMemoryStore {
    async fn insert_record(
        &self,
        entity: &str,
        key_field: &str,
        record: Record,
    ) -> EntityStoreResult<Value> {
        let mut store = self.store.write().await;
        let collection = store.entry(entity.to_string()).or_default();

        // Key uniqueness is an external index's job on a real server; the
        // in-memory stand-in enforces it directly, with the driver's wording.
        if let Some(key) = record.get(key_field) {
            if collection.iter().any(|r| r.get(key_field) == Some(key)) {
                return Err(EntityStoreError::Backend(format!(
                    "E11000 duplicate key error collection: {entity} index: {key_field}_1"
                )));
            }
        }

        let id = Uuid::new_v4().to_string();
        let mut record = record;
        record.insert(INTERNAL_ID_FIELD.to_string(), Value::from(id.clone()));
        collection.push(record);

        Ok(Value::from(id))
    }

    async fn find_by_key(
        &self,
        entity: &str,
        key_field: &str,
        key: &str,
    ) -> EntityStoreResult<Option<Record>> {
        let store = self.store.read().await;
        let collection = match store.get(entity) {
            Some(col) => col,
            None => return Ok(None),
        };

        let mut matches = collection
            .iter()
            .filter(|r| field_equals_str(r, key_field, key))
            .collect::<Vec<_>>();
        matches.sort_by(|a, b| {
            let left = a.get(key_field).and_then(Value::as_str).unwrap_or("");
            let right = b.get(key_field).and_then(Value::as_str).unwrap_or("");
            left.cmp(right)
        });

        Ok(matches.first().map(|r| (*r).clone()))
    }

    async fn find_records(
        &self,
        entity: &str,
        filter: Option<(&str, &str)>,
    ) -> EntityStoreResult<Vec<Record>> {
        let store = self.store.read().await;
        let collection = match store.get(entity) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        Ok(match filter {
            Some((field, value)) => collection
                .iter()
                .filter(|r| field_equals_str(r, field, value))
                .cloned()
                .collect(),
            None => collection.clone(),
        })
    }

    async fn merge_record(
        &self,
        entity: &str,
        filter_field: &str,
        filter_value: &Value,
        record: Record,
    ) -> EntityStoreResult<u64> {
        let mut store = self.store.write().await;
        let collection = match store.get_mut(entity) {
            Some(col) => col,
            None => return Ok(0),
        };

        let target = collection
            .iter_mut()
            .find(|r| r.get(filter_field) == Some(filter_value));

        match target {
            Some(existing) => {
                for (field, value) in record {
                    existing.insert(field, value);
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_key(
        &self,
        entity: &str,
        key_field: &str,
        key: &str,
    ) -> EntityStoreResult<u64> {
        let mut store = self.store.write().await;
        let collection = match store.get_mut(entity) {
            Some(col) => col,
            None => return Ok(0),
        };

        // Case-insensitive match, mirroring the primary-strength collation
        // the MongoDB backend applies to deletes.
        let position = collection.iter().position(|r| {
            r.get(key_field)
                .and_then(Value::as_str)
                .is_some_and(|v| v.to_lowercase() == key.to_lowercase())
        });

        match position {
            Some(index) => {
                collection.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// Construction always succeeds; the builder exists so the in-memory backend
/// plugs into [`EntityStore::connect`](entitylayer_core::store::EntityStore::connect)
/// like any other backend.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl EntityBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> EntityStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
